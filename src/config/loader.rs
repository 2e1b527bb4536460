//! Configuration loader
//!
//! Loading pipeline:
//! 1. Read and parse the YAML file (or start from defaults)
//! 2. Resolve a relative model path against the config file's directory
//! 3. Apply `GAZETTE_*` environment overrides
//! 4. Apply command-line overrides
//! 5. Validate
//! 6. Freeze with `Arc`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::schema::ServiceConfig;
use crate::config::validation::Validator;
use crate::error::{ConfigError, ValidationIssue};

/// Environment variable overriding `server.bind`.
pub const ENV_BIND: &str = "GAZETTE_BIND";
/// Environment variable overriding `model.path`.
pub const ENV_MODEL_PATH: &str = "GAZETTE_MODEL_PATH";
/// Environment variable overriding `model.name`.
pub const ENV_MODEL_NAME: &str = "GAZETTE_MODEL_NAME";
/// Environment variable overriding `extraction.default_threshold`.
pub const ENV_DEFAULT_THRESHOLD: &str = "GAZETTE_DEFAULT_THRESHOLD";
/// Environment variable overriding `warmup`.
pub const ENV_WARMUP: &str = "GAZETTE_WARMUP";

// ============================================================================
// Public API
// ============================================================================

/// Values given on the command line. They win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--bind`
    pub bind: Option<String>,
    /// `--model`
    pub model_path: Option<PathBuf>,
    /// `--no-warmup` sets this to `Some(false)`
    pub warmup: Option<bool>,
}

/// A validated configuration plus any warnings raised while validating.
#[derive(Debug)]
pub struct LoadResult {
    /// The frozen configuration.
    pub config: Arc<ServiceConfig>,
    /// Non-fatal validation findings.
    pub warnings: Vec<ValidationIssue>,
}

/// Loads configuration from an optional file plus overrides.
#[derive(Debug)]
pub struct ConfigLoader<E = fn(&str) -> Option<String>> {
    env: E,
}

impl ConfigLoader {
    /// Creates a loader that reads overrides from the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: |name| std::env::var(name).ok(),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ConfigLoader<E>
where
    E: Fn(&str) -> Option<String>,
{
    /// Creates a loader with a custom environment lookup.
    pub const fn with_env(env: E) -> Self {
        Self { env }
    }

    /// Runs the loading pipeline.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is missing or malformed, an
    /// environment override does not parse, or validation fails.
    pub fn load(
        &self,
        path: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<LoadResult, ConfigError> {
        let mut config = match path {
            Some(path) => read_file(path)?,
            None => ServiceConfig::default(),
        };

        self.apply_env(&mut config)?;
        apply_overrides(&mut config, overrides);

        let result = Validator::new().validate(&config);
        if !result.is_valid() {
            return Err(ConfigError::Invalid {
                path: path.map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string()),
                errors: result.errors,
            });
        }

        Ok(LoadResult {
            config: Arc::new(config),
            warnings: result.warnings,
        })
    }

    fn apply_env(&self, config: &mut ServiceConfig) -> Result<(), ConfigError> {
        if let Some(bind) = (self.env)(ENV_BIND) {
            config.server.bind = bind;
        }
        if let Some(path) = (self.env)(ENV_MODEL_PATH) {
            config.model.path = PathBuf::from(path);
        }
        if let Some(name) = (self.env)(ENV_MODEL_NAME) {
            config.model.name = name;
        }
        if let Some(raw) = (self.env)(ENV_DEFAULT_THRESHOLD) {
            config.extraction.default_threshold =
                parse_env(ENV_DEFAULT_THRESHOLD, &raw, "a number between 0.0 and 1.0")?;
        }
        if let Some(raw) = (self.env)(ENV_WARMUP) {
            config.warmup = parse_env(ENV_WARMUP, &raw, "true or false")?;
        }
        Ok(())
    }
}

// ============================================================================
// Pipeline Steps
// ============================================================================

fn read_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: e.to_string(),
            }
        }
    })?;

    // An empty file is a valid, all-defaults configuration.
    let mut config: ServiceConfig = if raw.trim().is_empty() {
        ServiceConfig::default()
    } else {
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?
    };

    if config.model.path.is_relative() {
        if let Some(dir) = path.parent() {
            config.model.path = dir.join(&config.model.path);
        }
    }

    Ok(config)
}

fn apply_overrides(config: &mut ServiceConfig, overrides: &Overrides) {
    if let Some(ref bind) = overrides.bind {
        config.server.bind.clone_from(bind);
    }
    if let Some(ref path) = overrides.model_path {
        config.model.path.clone_from(path);
    }
    if let Some(warmup) = overrides.warmup {
        config.warmup = warmup;
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str, expected: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: name.to_string(),
        value: raw.to_string(),
        expected: expected.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
