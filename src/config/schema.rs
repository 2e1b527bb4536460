//! Configuration schema types
//!
//! Deserialized from `gazette.yaml`. Every field has a default, so an empty
//! file (or no file at all) is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::extract::DEFAULT_THRESHOLD;
use crate::handle::ResourceDescriptor;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8765";

/// Default request body limit (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Default per-request text limit in characters.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 100_000;

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for the `gazette` service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// HTTP listener settings
    pub server: ServerSettings,

    /// Model identity and loading
    pub model: ModelSettings,

    /// Extraction defaults
    pub extraction: ExtractionSettings,

    /// Load the model at startup instead of on the first request
    pub warmup: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            model: ModelSettings::default(),
            extraction: ExtractionSettings::default(),
            warmup: true,
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    /// `host:port`, `:port`, or bare `port`
    pub bind: String,

    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,

    /// Origins allowed to call the API from a browser; `"*"` allows any,
    /// an empty list sends no CORS headers
    pub cors_allow_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cors_allow_origins: vec!["*".to_string()],
        }
    }
}

/// Model identity and loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSettings {
    /// Model identifier reported by `/health` and `/model_info`
    pub name: String,

    /// Lexicon file; relative paths resolve against the config file
    pub path: PathBuf,

    /// Model type reported by `/model_info`
    pub model_type: String,

    /// Size description reported by `/model_info`
    pub parameters: String,

    /// License reported by `/model_info`
    pub license: String,

    /// Upper bound on one load attempt, in `humantime` syntax (`"30s"`)
    pub load_timeout: String,

    /// Longest accepted input in characters; `null` disables the limit
    pub max_text_chars: Option<usize>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: "gazette/lexicon-en".to_string(),
            path: PathBuf::from("model.yaml"),
            model_type: "Lexicon".to_string(),
            parameters: "n/a".to_string(),
            license: "Apache 2.0".to_string(),
            load_timeout: "30s".to_string(),
            max_text_chars: Some(DEFAULT_MAX_TEXT_CHARS),
        }
    }
}

impl ModelSettings {
    /// Static metadata for the model handle.
    #[must_use]
    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            model_name: self.name.clone(),
            model_type: self.model_type.clone(),
            parameters: self.parameters.clone(),
            license: self.license.clone(),
        }
    }
}

/// Extraction defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionSettings {
    /// Threshold used when a request omits one
    pub default_threshold: f64,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            default_threshold: DEFAULT_THRESHOLD,
        }
    }
}
