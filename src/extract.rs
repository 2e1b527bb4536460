//! Entity extraction requests.
//!
//! Validates caller input, runs it through the shared model handle, and
//! shapes the response. Used by both the HTTP `/extract` endpoint and the
//! `extract` CLI command.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExtractError, ValidationError};
use crate::handle::{LazyResourceHandle, ResourceLoader};
use crate::model::{Entity, EntityModel};
use crate::observability::metrics;

/// Threshold applied when a request does not carry one.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Longest text prefix quoted in error summaries.
const SUMMARY_PREVIEW_CHARS: usize = 40;

/// Request for entity extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    /// Text to analyze
    pub text: String,
    /// Entity types to extract (e.g. `["person", "organization"]`)
    pub entity_types: Vec<String>,
    /// Confidence threshold; the service default applies when absent
    #[serde(default)]
    pub threshold: Option<f64>,
}

impl ExtractRequest {
    /// Checks the request shape.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found: empty text, no entity
    /// types, a blank entity type, or a threshold outside `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if self.entity_types.is_empty() {
            return Err(ValidationError::NoEntityTypes);
        }
        if let Some(index) = self.entity_types.iter().position(|t| t.trim().is_empty()) {
            return Err(ValidationError::BlankEntityType { index });
        }
        if let Some(value) = self.threshold {
            validate_threshold(value)?;
        }
        Ok(())
    }

    /// Short description of the input for error reports.
    #[must_use]
    pub fn summary(&self) -> String {
        let chars = self.text.chars().count();
        let mut preview: String = self.text.chars().take(SUMMARY_PREVIEW_CHARS).collect();
        if chars > SUMMARY_PREVIEW_CHARS {
            preview.push('…');
        }
        format!(
            "text {preview:?} ({chars} chars) with entity types [{}]",
            self.entity_types.join(", ")
        )
    }
}

/// Checks that a threshold is a number in `[0.0, 1.0]`.
///
/// # Errors
///
/// Returns [`ValidationError::ThresholdOutOfRange`] otherwise.
pub fn validate_threshold(value: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::ThresholdOutOfRange { value })
    }
}

/// Response from entity extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Entities found, ordered by start offset
    pub entities: Vec<Entity>,
    /// Number of entities
    pub entity_count: usize,
    /// Character count of the input text
    pub text_length: usize,
}

/// Validates `request` and runs it against the model behind `handle`.
///
/// Loads the model first if nobody has yet.
///
/// # Errors
///
/// Returns [`ExtractError::Validation`] for bad input, without touching
/// the model, and [`ExtractError::Handle`] when the model cannot be loaded
/// or fails during prediction.
pub async fn extract<L>(
    handle: &LazyResourceHandle<L>,
    request: &ExtractRequest,
    default_threshold: f64,
) -> Result<ExtractResponse, ExtractError>
where
    L: ResourceLoader,
    L::Resource: EntityModel,
{
    if let Err(e) = request.validate() {
        metrics::record_extract_error("validation");
        return Err(e.into());
    }
    let threshold = request.threshold.unwrap_or(default_threshold);
    let started = Instant::now();

    let text = request.text.clone();
    let labels = request.entity_types.clone();
    let outcome = handle
        .use_resource(&request.summary(), move |model| {
            model.predict_entities(&text, &labels, threshold)
        })
        .await;

    let entities = match outcome {
        Ok(entities) => entities,
        Err(e) => {
            metrics::record_extract_error(metrics::handle_error_kind(&e));
            return Err(e.into());
        }
    };

    let text_length = request.text.chars().count();
    metrics::record_extraction(entities.len(), started.elapsed());
    debug!(
        entities = entities.len(),
        chars = text_length,
        "extracted entities"
    );

    Ok(ExtractResponse {
        entity_count: entities.len(),
        entities,
        text_length,
    })
}
