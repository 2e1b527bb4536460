//! Configuration validation
//!
//! Runs on the fully merged configuration (file, environment, command
//! line). Collects every issue rather than stopping at the first.

use std::time::Duration;

use crate::config::schema::ServiceConfig;
use crate::error::{Severity, ValidationIssue};

/// Bodies smaller than this are allowed but almost certainly a mistake.
const SMALL_BODY_LIMIT: usize = 1024;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns every issue found.
    pub fn validate(&mut self, config: &ServiceConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_server(config);
        self.validate_model(config);
        self.validate_extraction(config);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_server(&mut self, config: &ServiceConfig) {
        if let Err(e) = crate::api::parse_bind_addr(&config.server.bind) {
            self.error("server.bind", e.to_string());
        }
        if let Err(e) = crate::api::cors_layer(&config.server.cors_allow_origins) {
            self.error("server.cors_allow_origins", e.to_string());
        }
        match config.server.max_body_bytes {
            0 => self.error("server.max_body_bytes", "must be greater than zero"),
            n if n < SMALL_BODY_LIMIT => self.warning(
                "server.max_body_bytes",
                format!("{n} bytes leaves little room for request text"),
            ),
            _ => {}
        }
    }

    fn validate_model(&mut self, config: &ServiceConfig) {
        let model = &config.model;
        if model.name.trim().is_empty() {
            self.error("model.name", "must not be empty");
        }
        if model.path.as_os_str().is_empty() {
            self.error("model.path", "must not be empty");
        }
        match parse_load_timeout(&model.load_timeout) {
            Ok(d) if d.is_zero() => self.error("model.load_timeout", "must be greater than zero"),
            Ok(_) => {}
            Err(e) => self.error("model.load_timeout", e),
        }
        if model.max_text_chars == Some(0) {
            self.error("model.max_text_chars", "must be greater than zero or null");
        }
    }

    fn validate_extraction(&mut self, config: &ServiceConfig) {
        let threshold = config.extraction.default_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            self.error(
                "extraction.default_threshold",
                format!("{threshold} is outside [0.0, 1.0]"),
            );
        } else if threshold <= 0.0 {
            self.warning(
                "extraction.default_threshold",
                "0.0 returns every match regardless of score",
            );
        }
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, path: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }
}

/// Parses a `humantime` duration such as `"30s"` or `"2m 30s"`.
///
/// # Errors
///
/// Returns a description of the parse failure.
pub fn parse_load_timeout(raw: &str) -> Result<Duration, String> {
    humantime::parse_duration(raw.trim()).map_err(|e| format!("invalid duration '{raw}': {e}"))
}
