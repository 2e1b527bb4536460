//! Entity recognition model interface.
//!
//! [`EntityModel`] is the operation the HTTP layer needs from a loaded
//! model. [`LexiconModel`] is the built-in implementation, loaded from a
//! YAML lexicon file by [`LexiconLoader`].

pub mod lexicon;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

pub use lexicon::{LexiconError, LexiconLoader, LexiconModel};

/// An entity found in the input text.
///
/// `start` and `end` are character offsets (end exclusive), so the entity
/// text is `input.chars().skip(start).take(end - start)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Matched text, exactly as it appears in the input
    pub text: String,
    /// Entity type, spelled as the caller requested it
    pub label: String,
    /// Start character index
    pub start: usize,
    /// End character index (exclusive)
    pub end: usize,
    /// Confidence score in `[0.0, 1.0]`
    pub score: f64,
}

impl Entity {
    /// Number of characters covered by the entity.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Checks the span against the text it was extracted from.
    #[must_use]
    pub fn matches_source(&self, source: &str) -> bool {
        !self.is_empty()
            && source
                .chars()
                .skip(self.start)
                .take(self.len())
                .eq(self.text.chars())
            && source.chars().count() >= self.end
    }
}

/// A loaded named-entity-recognition model.
///
/// Implementations are shared read-only across concurrent requests.
pub trait EntityModel: Send + Sync {
    /// Finds entities of the requested types in `text`.
    ///
    /// Entities scoring below `threshold` are dropped. Results are ordered
    /// by start offset and do not overlap.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if the model cannot process the input.
    fn predict_entities(
        &self,
        text: &str,
        labels: &[String],
        threshold: f64,
    ) -> Result<Vec<Entity>, ModelError>;
}
