//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod extract;
pub mod serve;
pub mod validate;
pub mod version;

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigLoader, LoadResult, Overrides, ServiceConfig, parse_load_timeout};
use crate::error::{ConfigError, GazetteError};
use crate::handle::LazyResourceHandle;
use crate::model::LexiconLoader;

/// Handle type used by every command: the lexicon model behind a lazy,
/// single-flight handle.
pub type ModelHandle = LazyResourceHandle<LexiconLoader>;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), GazetteError> {
    match cli.command {
        Commands::Serve(args) => serve::run(&args, cancel).await,
        Commands::Extract(args) => extract::run(&args).await,
        Commands::Validate(args) => validate::run(&args).await,
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Loads configuration and logs its warnings.
///
/// # Errors
///
/// Returns the loader's [`ConfigError`].
pub fn load_config(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<LoadResult, GazetteError> {
    if let Some(path) = path {
        tracing::info!(config = %path.display(), "loading configuration");
    }
    let result = ConfigLoader::new().load(path, overrides)?;
    for warning in &result.warnings {
        tracing::warn!(location = %warning.path, "{}", warning.message);
    }
    Ok(result)
}

/// Builds the model handle described by `config`. Does not load the model.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the load timeout does not parse.
pub fn build_model_handle(config: &ServiceConfig) -> Result<ModelHandle, GazetteError> {
    let timeout =
        parse_load_timeout(&config.model.load_timeout).map_err(|_| ConfigError::InvalidValue {
            field: "model.load_timeout".to_string(),
            value: config.model.load_timeout.clone(),
            expected: "a duration such as \"30s\"".to_string(),
        })?;
    let loader = LexiconLoader::new(&config.model.path, config.model.descriptor())
        .with_max_text_chars(config.model.max_text_chars);
    Ok(LazyResourceHandle::new(loader).with_load_timeout(timeout))
}
