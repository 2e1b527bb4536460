//! `validate` command
//!
//! Checks the configuration and, unless told otherwise, loads the model
//! once so a broken lexicon is caught before deployment.

use serde_json::json;

use super::{build_model_handle, load_config};
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::Overrides;
use crate::error::GazetteError;

/// Validate configuration and model.
///
/// # Errors
///
/// Returns a config error if the configuration is invalid, or an
/// initialization error if the model does not load.
pub async fn run(args: &ValidateArgs) -> Result<(), GazetteError> {
    let overrides = Overrides {
        model_path: args.model.clone(),
        ..Overrides::default()
    };
    let loaded = load_config(args.config.as_deref(), &overrides)?;
    let config = loaded.config;
    let config_label = args
        .config
        .as_ref()
        .map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string());

    let model = if args.skip_model {
        None
    } else {
        let handle = build_model_handle(&config)?;
        tracing::info!(path = %config.model.path.display(), "loading model");
        Some(handle.acquire().await?)
    };

    match args.format {
        OutputFormat::Human => {
            println!("configuration valid: {config_label}");
            for warning in &loaded.warnings {
                println!("  {warning}");
            }
            if let Some(model) = &model {
                println!(
                    "model {} loaded from {}: {} labels ({}), {} entries",
                    config.model.name,
                    config.model.path.display(),
                    model.label_names().len(),
                    model.label_names().join(", "),
                    model.entry_count()
                );
            }
        }
        OutputFormat::Json => {
            let warnings: Vec<String> = loaded.warnings.iter().map(ToString::to_string).collect();
            let model_json = model.as_ref().map(|m| {
                json!({
                    "name": config.model.name,
                    "path": config.model.path.display().to_string(),
                    "labels": m.label_names(),
                    "entries": m.entry_count()
                })
            });
            let output = json!({
                "config": config_label,
                "valid": true,
                "warnings": warnings,
                "model": model_json
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
