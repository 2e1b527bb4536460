//! Property tests: every entity the lexicon model returns is a valid,
//! non-overlapping character span of the input, and results are stable.

use proptest::prelude::*;

use gazette::model::{EntityModel, LexiconModel};

const LEXICON: &str = include_str!("fixtures/lexicon.yaml");

const LABELS: &[&str] = &[
    "organization",
    "org",
    "company",
    "person",
    "people",
    "location",
    "city",
    "place",
    "unknown",
];

fn model() -> LexiconModel {
    LexiconModel::from_yaml(LEXICON).expect("fixture lexicon compiles")
}

/// Text built from fragments that include lexicon entries, near misses,
/// and multi-byte characters.
fn text_strategy() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("Acme Corp".to_string()),
        Just("acme corp".to_string()),
        Just("Acme Corporation".to_string()),
        Just("Globex".to_string()),
        Just("Initech".to_string()),
        Just("Ada Lovelace".to_string()),
        Just("Grace Hopper".to_string()),
        Just("New York".to_string()),
        Just("São Paulo".to_string()),
        Just("Londoner".to_string()),
        Just("London".to_string()),
        Just("Paris".to_string()),
        "[a-zA-Z]{1,8}",
        "[ ,.;:!?\n-]{1,3}",
        "[àéîõüßçøł日本語]{1,3}",
    ];
    prop::collection::vec(fragment, 0..12).prop_map(|parts| parts.join(" "))
}

fn labels_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(LABELS), 1..4)
        .prop_map(|labels| labels.into_iter().map(str::to_string).collect())
}

proptest! {
    #[test]
    fn entities_are_valid_character_spans(
        text in text_strategy(),
        labels in labels_strategy(),
        threshold in 0.0f64..=1.0,
    ) {
        let model = model();
        let entities = model.predict_entities(&text, &labels, threshold).unwrap();
        let char_count = text.chars().count();

        for entity in &entities {
            prop_assert!(entity.start < entity.end);
            prop_assert!(entity.end <= char_count);
            prop_assert!(entity.matches_source(&text), "{entity:?} not in {text:?}");
            prop_assert!(entity.score >= threshold);
            prop_assert!((0.0..=1.0).contains(&entity.score));
            prop_assert!(labels.contains(&entity.label));
        }
        for pair in entities.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start, "overlap: {pair:?}");
        }
    }

    #[test]
    fn prediction_is_deterministic(
        text in text_strategy(),
        labels in labels_strategy(),
        threshold in 0.0f64..=1.0,
    ) {
        let model = model();
        let first = model.predict_entities(&text, &labels, threshold).unwrap();
        let second = model.predict_entities(&text, &labels, threshold).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn raising_threshold_never_adds_entities(
        text in text_strategy(),
        labels in labels_strategy(),
        low in 0.0f64..=1.0,
        delta in 0.0f64..=1.0,
    ) {
        let high = (low + delta).min(1.0);
        let model = model();
        let loose = model.predict_entities(&text, &labels, low).unwrap();
        let strict = model.predict_entities(&text, &labels, high).unwrap();
        prop_assert!(strict.len() <= loose.len());
    }
}
