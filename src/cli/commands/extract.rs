//! `extract` command
//!
//! One-shot extraction: loads the model, runs one request, prints the
//! response as JSON on stdout.

use tokio::io::AsyncReadExt;

use super::{build_model_handle, load_config};
use crate::cli::args::ExtractArgs;
use crate::config::Overrides;
use crate::error::GazetteError;
use crate::extract::{ExtractRequest, extract};

/// Extract entities from the given text (or stdin) and print them.
///
/// # Errors
///
/// Returns a usage error when stdin is empty and no text was given, a
/// validation error for bad input, a model error if the lexicon cannot be
/// loaded, or an I/O error if stdin cannot be read.
pub async fn run(args: &ExtractArgs) -> Result<(), GazetteError> {
    let overrides = Overrides {
        model_path: args.model.clone(),
        warmup: Some(false),
        ..Overrides::default()
    };
    let config = load_config(args.config.as_deref(), &overrides)?.config;
    let handle = build_model_handle(&config)?;

    let text = match args.text.as_deref() {
        Some(text) if text != "-" => text.to_string(),
        _ => {
            let text = read_stdin().await?;
            if text.is_empty() {
                return Err(GazetteError::Usage(
                    "no text to analyze: pass TEXT or pipe it on stdin".to_string(),
                ));
            }
            text
        }
    };

    let request = ExtractRequest {
        text,
        entity_types: args.entity_types.clone(),
        threshold: args.threshold,
    };
    let response = extract(&handle, &request, config.extraction.default_threshold).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn read_stdin() -> Result<String, GazetteError> {
    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await?;
    Ok(buf.trim_end_matches(['\n', '\r']).to_string())
}
