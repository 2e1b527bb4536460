//! Metrics collection for `gazette`.
//!
//! Prometheus-compatible metrics through the `metrics` facade. Recording
//! functions are no-ops until [`init_metrics`] installs a recorder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::{GazetteError, HandleError};

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Endpoints served by the HTTP API.
///
/// Any other path is bucketed as `"__unknown__"` so probing clients cannot
/// grow label cardinality.
const KNOWN_ENDPOINTS: [&str; 5] = ["/", "/health", "/model_info", "/describe", "/extract"];

/// Sanitizes a request path for use as a metrics label.
#[must_use]
pub fn sanitize_endpoint_label(path: &str) -> &str {
    if KNOWN_ENDPOINTS.contains(&path) {
        path
    } else {
        "__unknown__"
    }
}

/// Installs the global recorder and serves Prometheus metrics on
/// `127.0.0.1:<port>`. Later calls are no-ops.
///
/// # Errors
///
/// Returns `GazetteError::Io` if the recorder or HTTP listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: u16) -> Result<(), GazetteError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    PrometheusBuilder::new()
        .with_http_listener(([127, 0, 0, 1], port))
        .install()
        .map_err(|e| GazetteError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "gazette_requests_total",
        "Total number of HTTP requests by endpoint"
    );
    describe_counter!(
        "gazette_extract_errors_total",
        "Failed extractions by error kind"
    );
    describe_counter!("gazette_entities_total", "Entities returned");
    describe_histogram!(
        "gazette_extract_duration_ms",
        "Extraction duration in milliseconds, excluding model load"
    );
    describe_counter!(
        "gazette_model_loads_total",
        "Model load attempts by outcome"
    );
    describe_histogram!(
        "gazette_model_load_duration_ms",
        "Model load duration in milliseconds"
    );
    describe_gauge!("gazette_model_loaded", "1 once the model is loaded");
}

/// Records an incoming HTTP request.
pub fn record_request(path: &str) {
    let label = sanitize_endpoint_label(path);
    counter!("gazette_requests_total", "endpoint" => label.to_owned()).increment(1);
}

/// Records a completed extraction.
#[allow(clippy::cast_precision_loss)]
pub fn record_extraction(entities: usize, duration: Duration) {
    counter!("gazette_entities_total").increment(entities as u64);
    histogram!("gazette_extract_duration_ms").record(duration.as_secs_f64() * 1000.0);
}

/// Records a failed extraction by kind
/// (`validation`, `initialization`, `operation`).
pub fn record_extract_error(kind: &'static str) {
    counter!("gazette_extract_errors_total", "kind" => kind).increment(1);
}

/// Maps a handle error onto its metrics label.
#[must_use]
pub const fn handle_error_kind(error: &HandleError) -> &'static str {
    match error {
        HandleError::Initialization(_) => "initialization",
        HandleError::Operation(_) => "operation",
    }
}

/// Records a model load attempt.
pub fn record_model_load(success: bool, duration: Duration) {
    let outcome = if success { "success" } else { "failure" };
    counter!("gazette_model_loads_total", "outcome" => outcome).increment(1);
    histogram!("gazette_model_load_duration_ms", "outcome" => outcome)
        .record(duration.as_secs_f64() * 1000.0);
    if success {
        gauge!("gazette_model_loaded").set(1.0);
    }
}
