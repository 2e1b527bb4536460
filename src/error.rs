//! Error types for `gazette`
//!
//! The request path distinguishes three failure classes: initialization of
//! the shared model (retryable by a later request), caller input validation
//! (never retried), and model operation failures after a successful load.
//! Process-level errors aggregate into [`GazetteError`], which maps onto
//! CLI exit codes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::model::LexiconError;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `gazette` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// HTTP server error (bind failure, accept loop failure)
    pub const SERVE_ERROR: i32 = 4;

    /// Model initialization error (missing or malformed model file)
    pub const MODEL_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `gazette` operations.
///
/// Aggregates the domain errors and maps each onto an exit code.
#[derive(Debug, Error)]
pub enum GazetteError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP server error
    #[error(transparent)]
    Serve(#[from] ServeError),

    /// Model could not be initialized
    #[error(transparent)]
    Initialization(#[from] InitializationError),

    /// Extraction rejected or failed
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GazetteError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Serve(_) => ExitCode::SERVE_ERROR,
            Self::Initialization(_)
            | Self::Extract(ExtractError::Handle(HandleError::Initialization(_))) => {
                ExitCode::MODEL_ERROR
            }
            Self::Extract(ExtractError::Validation(_)) | Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Extract(ExtractError::Handle(HandleError::Operation(_))) | Self::Json(_) => {
                ExitCode::ERROR
            }
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Resource Errors
// ============================================================================

/// The shared resource failed to initialize.
///
/// The handle stays uninitialized after any of these, so a later
/// acquisition starts over from scratch. Cloneable so one failed attempt
/// can be reported to every caller that waited on it.
#[derive(Debug, Clone, Error)]
pub enum InitializationError {
    /// Model file does not exist
    #[error("model file not found: {}", path.display())]
    MissingModel {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Model file exists but could not be read
    #[error("failed to read model file {}: {source}", path.display())]
    Read {
        /// Path to the model file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Model file was read but is not a valid lexicon
    #[error("invalid model file {}: {source}", path.display())]
    InvalidModel {
        /// Path to the model file
        path: PathBuf,
        /// What was wrong with it
        #[source]
        source: Arc<LexiconError>,
    },

    /// Loading did not finish within the configured limit
    #[error("loading '{resource}' timed out after {}", humantime::format_duration(*timeout))]
    Timeout {
        /// Resource identifier
        resource: String,
        /// Configured load timeout
        timeout: Duration,
    },

    /// The loader task panicked or was cancelled
    #[error("loader for '{resource}' aborted: {reason}")]
    Aborted {
        /// Resource identifier
        resource: String,
        /// Panic or cancellation message
        reason: String,
    },
}

/// The resource failed while serving a request after a successful load.
#[derive(Debug, Error)]
#[error("operation failed for {input}: {cause}")]
pub struct OperationError {
    /// Short summary of the input that triggered the failure
    pub input: String,
    /// Underlying cause reported by the resource
    pub cause: String,
}

/// Errors returned by [`LazyResourceHandle::use_resource`].
///
/// [`LazyResourceHandle::use_resource`]: crate::handle::LazyResourceHandle::use_resource
#[derive(Debug, Error)]
pub enum HandleError {
    /// Resource could not be initialized
    #[error("initialization failed: {0}")]
    Initialization(#[from] InitializationError),

    /// Resource failed mid-operation
    #[error(transparent)]
    Operation(#[from] OperationError),
}

// ============================================================================
// Model Errors
// ============================================================================

/// Failures reported by an [`EntityModel`](crate::model::EntityModel).
#[derive(Debug, Error)]
pub enum ModelError {
    /// Input exceeds what the model accepts
    #[error("text has {chars} characters, model accepts at most {limit}")]
    TextTooLong {
        /// Character count of the input
        chars: usize,
        /// Model limit
        limit: usize,
    },

    /// Any other prediction failure
    #[error("prediction failed: {0}")]
    Prediction(String),
}

// ============================================================================
// Request Errors
// ============================================================================

/// Caller input that does not satisfy the extraction request contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// `text` was empty
    #[error("text must not be empty")]
    EmptyText,

    /// `entity_types` was empty
    #[error("entity_types must contain at least one entry")]
    NoEntityTypes,

    /// One of the entity types was empty or whitespace
    #[error("entity_types[{index}] must not be blank")]
    BlankEntityType {
        /// Position of the offending entry
        index: usize,
    },

    /// Threshold outside `[0.0, 1.0]` or not a number
    #[error("threshold must be between 0.0 and 1.0, got {value}")]
    ThresholdOutOfRange {
        /// Value supplied by the caller
        value: f64,
    },
}

/// Errors returned by [`extract`](crate::extract::extract).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Request was rejected before touching the model
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Model could not be loaded or failed while extracting
    #[error(transparent)]
    Handle(#[from] HandleError),
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {}{}: {message}", path.display(), line.map_or_else(String::new, |l| format!(" (line {l})")))]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}: {}", format_issues(errors))]
    Invalid {
        /// Path to the configuration file, or `<defaults>`
        path: String,
        /// Every error found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {}", path.display())]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Dotted path to the problematic field (e.g. `"model.load_timeout"`)
    pub path: String,
    /// Description of the issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Prevents the configuration from being used
    Error,
    /// Reported, but the configuration still loads
    Warning,
}

// ============================================================================
// Server Errors
// ============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Could not bind the listening socket
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested bind address
        addr: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Bind address does not parse as a socket address
    #[error("invalid bind address \"{addr}\": {reason}")]
    InvalidAddress {
        /// Address as given
        addr: String,
        /// Parser message
        reason: String,
    },

    /// A configured CORS origin is not a valid header value
    #[error("invalid CORS origin \"{origin}\": {reason}")]
    InvalidOrigin {
        /// Origin as configured
        origin: String,
        /// Parser message
        reason: String,
    },

    /// Accept loop terminated with an error
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `gazette` operations.
pub type Result<T> = std::result::Result<T, GazetteError>;

// ============================================================================
// Tests
// ============================================================================
