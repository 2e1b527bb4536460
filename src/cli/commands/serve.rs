//! `serve` command
//!
//! Loads configuration, optionally warms up the model, and serves the HTTP
//! API until shutdown is requested.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{build_model_handle, load_config};
use crate::api::{self, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Overrides;
use crate::error::GazetteError;

/// Start the HTTP service.
///
/// # Errors
///
/// Returns a config error for invalid configuration, or a serve error if
/// the listener cannot be bound. A model that fails to load during warmup
/// is not an error; it is retried on the first request.
pub async fn run(args: &ServeArgs, cancel: CancellationToken) -> Result<(), GazetteError> {
    if let Some(port) = args.metrics_port {
        crate::observability::init_metrics(port)?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    let overrides = Overrides {
        bind: args.bind.clone(),
        model_path: args.model.clone(),
        warmup: args.no_warmup.then_some(false),
    };
    let config = load_config(args.config.as_deref(), &overrides)?.config;
    let handle = Arc::new(build_model_handle(&config)?);

    if config.warmup {
        tracing::info!(model = %handle.name(), "warming up model");
        tokio::select! {
            ready = handle.warmup() => {
                if ready {
                    tracing::info!("model ready");
                }
            }
            () = cancel.cancelled() => {
                tracing::info!("shutdown requested during warmup");
                return Ok(());
            }
        }
    }

    let state = AppState {
        handle,
        default_threshold: config.extraction.default_threshold,
    };
    let router = api::build_router(state, &config.server)?;

    let (listener, bound_addr) = api::bind(&config.server.bind).await?;
    tracing::info!(%bound_addr, "HTTP server listening");
    api::serve(listener, router, cancel).await?;
    Ok(())
}
