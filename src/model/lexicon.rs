//! Lexicon-backed entity model.
//!
//! A lexicon file lists surface forms per label, each with an optional
//! confidence score, plus aliases under which a label may be requested:
//!
//! ```yaml
//! name: acme-lexicon
//! default_score: 0.8
//! labels:
//!   organization:
//!     aliases: [org, company]
//!     entries:
//!       - text: Acme Corp
//!         score: 0.92
//!       - Globex
//! ```
//!
//! Loading parses the file and compiles one matcher per label. Matching is
//! whole-word and, unless `case_sensitive` is set, case-insensitive.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::{Entity, EntityModel};
use crate::error::{InitializationError, ModelError};
use crate::handle::{ResourceDescriptor, ResourceLoader};

/// Score given to bare entries when the file does not set `default_score`.
pub const DEFAULT_ENTRY_SCORE: f64 = 0.8;

/// Compiled regex size ceiling. Large lexicons blow past the crate default.
const PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

// ============================================================================
// File Format
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default = "default_entry_score")]
    default_score: f64,
    #[serde(default)]
    case_sensitive: bool,
    labels: BTreeMap<String, LabelSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LabelSpec {
    #[serde(default)]
    aliases: Vec<String>,
    entries: Vec<EntrySpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntrySpec {
    Bare(String),
    Scored { text: String, score: Option<f64> },
}

impl EntrySpec {
    fn text(&self) -> &str {
        match self {
            Self::Bare(text) | Self::Scored { text, .. } => text,
        }
    }

    fn score(&self, default: f64) -> f64 {
        match self {
            Self::Bare(_) | Self::Scored { score: None, .. } => default,
            Self::Scored {
                score: Some(score), ..
            } => *score,
        }
    }
}

const fn default_entry_score() -> f64 {
    DEFAULT_ENTRY_SCORE
}

/// Reasons a lexicon file cannot be turned into a model.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// Not valid YAML, or not shaped like a lexicon
    #[error("malformed lexicon: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The `labels` map is empty
    #[error("lexicon defines no labels")]
    NoLabels,

    /// A label has an empty `entries` list
    #[error("label '{label}' has no entries")]
    NoEntries {
        /// Offending label
        label: String,
    },

    /// An entry is empty or whitespace
    #[error("label '{label}' has a blank entry")]
    BlankEntry {
        /// Offending label
        label: String,
    },

    /// An entry score is outside `[0.0, 1.0]`
    #[error("score {score} for '{entry}' in label '{label}' is outside [0.0, 1.0]")]
    ScoreOutOfRange {
        /// Label the entry belongs to
        label: String,
        /// Entry text
        entry: String,
        /// Score given
        score: f64,
    },

    /// `default_score` is outside `[0.0, 1.0]`
    #[error("default_score {0} is outside [0.0, 1.0]")]
    DefaultScoreOutOfRange(f64),

    /// The same name or alias resolves to two labels
    #[error("name '{name}' is claimed by both '{first}' and '{second}'")]
    AliasConflict {
        /// The ambiguous name
        name: String,
        /// Label that claimed it first
        first: String,
        /// Label that claimed it again
        second: String,
    },

    /// The matcher for a label failed to compile
    #[error("failed to compile matcher for label '{label}': {source}")]
    Pattern {
        /// Offending label
        label: String,
        /// Regex error
        #[source]
        source: regex::Error,
    },
}

// ============================================================================
// Compiled Model
// ============================================================================

#[derive(Debug)]
struct CompiledLabel {
    name: String,
    /// One capture group per surface form, in `surface_scores` order.
    pattern: Regex,
    scores: HashMap<String, f64>,
    surface_scores: Vec<f64>,
    entry_count: usize,
}

/// An entity model that recognises the surface forms listed in a lexicon.
#[derive(Debug)]
pub struct LexiconModel {
    name: Option<String>,
    labels: Vec<CompiledLabel>,
    lookup: HashMap<String, usize>,
    case_sensitive: bool,
    default_score: f64,
    max_text_chars: Option<usize>,
}

/// A match that survived the threshold, before overlap resolution.
/// `start` and `end` are byte offsets; `chars` is the match length in
/// characters.
struct Candidate<'a> {
    start: usize,
    end: usize,
    chars: usize,
    score: f64,
    label: &'a str,
}

impl LexiconModel {
    /// Parses and compiles a lexicon from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a [`LexiconError`] describing the first problem found.
    pub fn from_yaml(raw: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_yaml::from_str(raw)?;
        Self::compile(file)
    }

    /// Rejects inputs longer than `limit` characters.
    #[must_use]
    pub fn with_max_text_chars(mut self, limit: Option<usize>) -> Self {
        self.max_text_chars = limit;
        self
    }

    /// Lexicon name from the file, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Canonical label names, sorted.
    #[must_use]
    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }

    /// Total number of distinct entries across all labels.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.labels.iter().map(|l| l.entry_count).sum()
    }

    fn compile(file: LexiconFile) -> Result<Self, LexiconError> {
        if file.labels.is_empty() {
            return Err(LexiconError::NoLabels);
        }
        if !(0.0..=1.0).contains(&file.default_score) {
            return Err(LexiconError::DefaultScoreOutOfRange(file.default_score));
        }

        let mut labels = Vec::with_capacity(file.labels.len());
        let mut lookup: HashMap<String, usize> = HashMap::new();

        for (index, (name, spec)) in file.labels.into_iter().enumerate() {
            for claimed in std::iter::once(&name).chain(spec.aliases.iter()) {
                let key = claimed.trim().to_lowercase();
                if let Some(&previous) = lookup.get(&key) {
                    let first = if previous == index {
                        name.clone()
                    } else {
                        labels
                            .get(previous)
                            .map_or_else(String::new, |l: &CompiledLabel| l.name.clone())
                    };
                    return Err(LexiconError::AliasConflict {
                        name: claimed.clone(),
                        first,
                        second: name,
                    });
                }
                lookup.insert(key, index);
            }

            labels.push(compile_label(
                name,
                &spec.entries,
                file.default_score,
                file.case_sensitive,
            )?);
        }

        Ok(Self {
            name: file.name,
            labels,
            lookup,
            case_sensitive: file.case_sensitive,
            default_score: file.default_score,
            max_text_chars: None,
        })
    }

    /// Score of the entry the match at `start` came from.
    ///
    /// Case-insensitive matching uses Unicode case folding, which
    /// lowercasing does not always reproduce (`ſ` matches `s`). When the
    /// lowercased key misses, the capture group of the match names the
    /// entry.
    fn score_of(&self, label: &CompiledLabel, text: &str, start: usize, surface: &str) -> f64 {
        let key = if self.case_sensitive {
            surface.to_string()
        } else {
            surface.to_lowercase()
        };
        if let Some(&score) = label.scores.get(&key) {
            return score;
        }
        label
            .pattern
            .captures_at(text, start)
            .and_then(|caps| {
                caps.iter()
                    .skip(1)
                    .position(|group| group.is_some())
            })
            .and_then(|group| label.surface_scores.get(group).copied())
            .unwrap_or(self.default_score)
    }
}

fn compile_label(
    name: String,
    entries: &[EntrySpec],
    default_score: f64,
    case_sensitive: bool,
) -> Result<CompiledLabel, LexiconError> {
    if entries.is_empty() {
        return Err(LexiconError::NoEntries { label: name });
    }

    let mut scores: HashMap<String, f64> = HashMap::new();
    let mut surfaces: Vec<&str> = Vec::with_capacity(entries.len());

    for entry in entries {
        let text = entry.text().trim();
        if text.is_empty() {
            return Err(LexiconError::BlankEntry { label: name });
        }
        let score = entry.score(default_score);
        if !(0.0..=1.0).contains(&score) {
            return Err(LexiconError::ScoreOutOfRange {
                label: name,
                entry: text.to_string(),
                score,
            });
        }
        let key = if case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };
        match scores.get_mut(&key) {
            Some(existing) => *existing = existing.max(score),
            None => {
                scores.insert(key, score);
                surfaces.push(text);
            }
        }
    }

    // Longest first so the leftmost-first regex prefers the longest entry
    // starting at a given position.
    surfaces.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    let alternation = surfaces
        .iter()
        .map(|s| format!("({})", bounded(s)))
        .collect::<Vec<_>>()
        .join("|");
    let surface_scores = surfaces
        .iter()
        .map(|s| {
            let key = if case_sensitive {
                (*s).to_string()
            } else {
                s.to_lowercase()
            };
            scores.get(&key).copied().unwrap_or(default_score)
        })
        .collect();

    let pattern = RegexBuilder::new(&alternation)
        .case_insensitive(!case_sensitive)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|source| LexiconError::Pattern {
            label: name.clone(),
            source,
        })?;

    Ok(CompiledLabel {
        name,
        pattern,
        entry_count: scores.len(),
        scores,
        surface_scores,
    })
}

/// Escapes `surface` and adds word boundaries on the sides that start or
/// end with a word character.
fn bounded(surface: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut out = String::with_capacity(surface.len() + 8);
    if surface.chars().next().is_some_and(is_word) {
        out.push_str(r"\b");
    }
    out.push_str(&regex::escape(surface));
    if surface.chars().next_back().is_some_and(is_word) {
        out.push_str(r"\b");
    }
    out
}

impl EntityModel for LexiconModel {
    fn predict_entities(
        &self,
        text: &str,
        labels: &[String],
        threshold: f64,
    ) -> Result<Vec<Entity>, ModelError> {
        if let Some(limit) = self.max_text_chars {
            let chars = text.chars().count();
            if chars > limit {
                return Err(ModelError::TextTooLong { chars, limit });
            }
        }

        let mut requested = HashSet::new();
        let mut candidates = Vec::new();

        for label in labels {
            let Some(&index) = self.lookup.get(&label.trim().to_lowercase()) else {
                debug!(label = %label, "label not in lexicon");
                continue;
            };
            if !requested.insert(index) {
                continue;
            }
            let compiled = &self.labels[index];
            for m in compiled.pattern.find_iter(text) {
                let score = self.score_of(compiled, text, m.start(), m.as_str());
                if score >= threshold {
                    candidates.push(Candidate {
                        start: m.start(),
                        end: m.end(),
                        chars: m.as_str().chars().count(),
                        score,
                        label,
                    });
                }
            }
        }

        Ok(resolve_overlaps(text, candidates))
    }
}

/// Keeps the longest (in characters), then highest scoring, then earliest
/// of any overlapping candidates and converts byte spans to character
/// spans.
fn resolve_overlaps(text: &str, mut candidates: Vec<Candidate<'_>>) -> Vec<Entity> {
    candidates.sort_by(|a, b| {
        b.chars
            .cmp(&a.chars)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| a.start.cmp(&b.start))
    });

    // Accepted spans never overlap, so the one starting closest before a
    // candidate's end is the only one that can reach into it.
    let mut taken: BTreeMap<usize, usize> = BTreeMap::new();
    let mut accepted: Vec<Candidate<'_>> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let overlaps = taken
            .range(..candidate.end)
            .next_back()
            .is_some_and(|(_, &end)| end > candidate.start);
        if !overlaps {
            taken.insert(candidate.start, candidate.end);
            accepted.push(candidate);
        }
    }
    accepted.sort_by_key(|c| c.start);

    let mut entities = Vec::with_capacity(accepted.len());
    let mut cursor = 0;
    let mut char_pos = 0;
    for c in accepted {
        char_pos += text[cursor..c.start].chars().count();
        entities.push(Entity {
            text: text[c.start..c.end].to_string(),
            label: c.label.to_string(),
            start: char_pos,
            end: char_pos + c.chars,
            score: c.score,
        });
        char_pos += c.chars;
        cursor = c.end;
    }
    entities
}

// ============================================================================
// Loader
// ============================================================================

/// Loads a [`LexiconModel`] from a file on first use.
#[derive(Debug, Clone)]
pub struct LexiconLoader {
    path: PathBuf,
    descriptor: ResourceDescriptor,
    max_text_chars: Option<usize>,
}

impl LexiconLoader {
    /// Creates a loader for the lexicon at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, descriptor: ResourceDescriptor) -> Self {
        Self {
            path: path.into(),
            descriptor,
            max_text_chars: None,
        }
    }

    /// Limits the input length the loaded model accepts.
    #[must_use]
    pub fn with_max_text_chars(mut self, limit: Option<usize>) -> Self {
        self.max_text_chars = limit;
        self
    }

    /// Path of the lexicon file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResourceLoader for LexiconLoader {
    type Resource = LexiconModel;

    fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    async fn load(&self) -> Result<LexiconModel, InitializationError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(InitializationError::MissingModel {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(InitializationError::Read {
                    path: self.path.clone(),
                    source: Arc::new(source),
                });
            }
        };

        // Compiling a large lexicon is CPU-bound; keep it off the reactor.
        let limit = self.max_text_chars;
        let model = tokio::task::spawn_blocking(move || LexiconModel::from_yaml(&raw))
            .await
            .map_err(|e| InitializationError::Aborted {
                resource: self.descriptor.model_name.clone(),
                reason: e.to_string(),
            })?
            .map_err(|source| InitializationError::InvalidModel {
                path: self.path.clone(),
                source: Arc::new(source),
            })?
            .with_max_text_chars(limit);

        info!(
            path = %self.path.display(),
            labels = model.labels.len(),
            entries = model.entry_count(),
            "lexicon compiled"
        );
        Ok(model)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON: &str = r"
name: test-lexicon
default_score: 0.8
labels:
  organization:
    aliases: [org, company]
    entries:
      - text: Acme Corp
        score: 0.92
      - text: Acme
        score: 0.5
      - Globex
  person:
    entries:
      - text: Ada Lovelace
        score: 0.95
      - Ada
  language:
    entries:
      - C++
      - Rust
";

    fn model() -> LexiconModel {
        LexiconModel::from_yaml(LEXICON).unwrap()
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn compiles_labels_and_entries() {
        let m = model();
        assert_eq!(m.name(), Some("test-lexicon"));
        assert_eq!(m.label_names(), vec!["language", "organization", "person"]);
        assert_eq!(m.entry_count(), 7);
    }

    #[test]
    fn finds_entities_with_char_offsets() {
        let text = "Ada Lovelace visited Acme Corp.";
        let found = model()
            .predict_entities(text, &labels(&["person", "organization"]), 0.3)
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text, "Ada Lovelace");
        assert_eq!(found[0].label, "person");
        assert_eq!((found[0].start, found[0].end), (0, 12));
        assert_eq!(found[1].text, "Acme Corp");
        assert_eq!(found[1].label, "organization");
        assert_eq!((found[1].start, found[1].end), (21, 30));
        assert!((found[1].score - 0.92).abs() < f64::EPSILON);
    }

    #[test]
    fn label_echoes_caller_spelling_for_aliases() {
        let found = model()
            .predict_entities("Globex hired us", &labels(&["Company"]), 0.3)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label, "Company");
        assert!((found[0].score - DEFAULT_ENTRY_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn matching_is_case_insensitive_by_default() {
        let found = model()
            .predict_entities("we met ACME CORP", &labels(&["org"]), 0.3)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "ACME CORP");
        assert!((found[0].score - 0.92).abs() < f64::EPSILON);
    }

    #[test]
    fn case_sensitive_lexicon_ignores_other_casing() {
        let m = LexiconModel::from_yaml(
            "case_sensitive: true\nlabels:\n  org:\n    entries: [Acme]\n",
        )
        .unwrap();
        assert!(
            m.predict_entities("acme", &labels(&["org"]), 0.0)
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            m.predict_entities("Acme", &labels(&["org"]), 0.0)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn threshold_filters_low_scores() {
        let found = model()
            .predict_entities("Acme and Acme Corp", &labels(&["org"]), 0.6)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Acme Corp");
    }

    #[test]
    fn longest_match_wins_across_labels() {
        // "Ada" (person) is inside "Ada Lovelace" (person) and must not
        // appear twice.
        let found = model()
            .predict_entities("Ada Lovelace", &labels(&["person"]), 0.0)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Ada Lovelace");
    }

    #[test]
    fn whole_words_only() {
        let found = model()
            .predict_entities("Acmeville and Rustacean", &labels(&["org", "language"]), 0.0)
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn symbol_edged_entries_match() {
        let found = model()
            .predict_entities("written in C++ and Rust", &labels(&["language"]), 0.0)
            .unwrap();
        let texts: Vec<_> = found.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["C++", "Rust"]);
    }

    #[test]
    fn non_ascii_text_offsets_are_char_based() {
        let text = "Über Acme Corp";
        let found = model()
            .predict_entities(text, &labels(&["org"]), 0.3)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start, found[0].end), (5, 14));
        assert!(found[0].matches_source(text));
    }

    #[test]
    fn unknown_label_yields_nothing() {
        let found = model()
            .predict_entities("Acme Corp", &labels(&["spaceship"]), 0.0)
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn duplicate_requested_labels_are_collapsed() {
        let found = model()
            .predict_entities("Acme Corp", &labels(&["org", "organization"]), 0.0)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label, "org");
    }

    #[test]
    fn text_limit_is_enforced() {
        let m = model().with_max_text_chars(Some(4));
        let err = m
            .predict_entities("Acme Corp", &labels(&["org"]), 0.3)
            .unwrap_err();
        assert!(matches!(err, ModelError::TextTooLong { chars: 9, limit: 4 }));
    }

    #[test]
    fn rejects_empty_labels() {
        let err = LexiconModel::from_yaml("labels: {}\n").unwrap_err();
        assert!(matches!(err, LexiconError::NoLabels));
    }

    #[test]
    fn rejects_out_of_range_score() {
        let err = LexiconModel::from_yaml(
            "labels:\n  org:\n    entries:\n      - text: Acme\n        score: 1.5\n",
        )
        .unwrap_err();
        assert!(matches!(err, LexiconError::ScoreOutOfRange { .. }));
    }

    #[test]
    fn rejects_alias_conflicts() {
        let err = LexiconModel::from_yaml(
            "labels:\n  org:\n    entries: [Acme]\n  team:\n    aliases: [ORG]\n    entries: [Blue]\n",
        )
        .unwrap_err();
        match err {
            LexiconError::AliasConflict { first, second, .. } => {
                assert_eq!(first, "org");
                assert_eq!(second, "team");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_blank_entries() {
        let err =
            LexiconModel::from_yaml("labels:\n  org:\n    entries: ['  ']\n").unwrap_err();
        assert!(matches!(err, LexiconError::BlankEntry { .. }));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = LexiconModel::from_yaml("labels:\n  org:\n    entries: [A]\nextra: 1\n")
            .unwrap_err();
        assert!(matches!(err, LexiconError::Parse(_)));
    }

    #[tokio::test]
    async fn loader_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = LexiconLoader::new(
            dir.path().join("absent.yaml"),
            ResourceDescriptor {
                model_name: "test".to_string(),
                model_type: "Lexicon".to_string(),
                parameters: "n/a".to_string(),
                license: "MIT".to_string(),
            },
        );
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, InitializationError::MissingModel { .. }));
    }

    #[test]
    fn longest_match_is_measured_in_characters() {
        // "€€€" is longer in bytes, "€ abcd" is longer in characters
        let m = LexiconModel::from_yaml(
            "labels:\n  currency:\n    entries: [\"€€€\"]\n  phrase:\n    entries: [\"€ abcd\"]\n",
        )
        .unwrap();
        let found = m
            .predict_entities("€€€ abcd", &labels(&["currency", "phrase"]), 0.0)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "€ abcd");
        assert_eq!((found[0].start, found[0].end), (2, 8));
    }

    #[test]
    fn case_folded_match_keeps_entry_score() {
        let m = LexiconModel::from_yaml(
            "default_score: 0.4\nlabels:\n  person:\n    entries:\n      - text: Sam\n        score: 0.9\n",
        )
        .unwrap();
        let found = m
            .predict_entities("hello ſam", &labels(&["person"]), 0.0)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "ſam");
        assert!((found[0].score - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn many_adjacent_matches_are_all_kept() {
        let m = LexiconModel::from_yaml("labels:\n  org:\n    entries: [a]\n").unwrap();
        let text = "a ".repeat(50_000);
        let found = m.predict_entities(&text, &labels(&["org"]), 0.0).unwrap();
        assert_eq!(found.len(), 50_000);
        assert_eq!((found[49_999].start, found[49_999].end), (99_998, 99_999));
        assert!(found.windows(2).all(|w| w[0].end < w[1].start));
    }

    #[test]
    fn overlap_check_sees_earlier_accepted_spans() {
        let m = LexiconModel::from_yaml(
            "labels:\n  org:\n    entries: [Acme Corp, Globex, Initech]\n  misc:\n    entries: [Corp, Globex and]\n",
        )
        .unwrap();
        let found = m
            .predict_entities("Acme Corp Globex and Initech", &labels(&["org", "misc"]), 0.0)
            .unwrap();
        let texts: Vec<&str> = found.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Acme Corp", "Globex and", "Initech"]);
        assert_eq!(found[1].label, "misc");
    }
}
