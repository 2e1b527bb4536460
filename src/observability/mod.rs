//! Observability module
//!
//! Logging and metrics infrastructure for monitoring `gazette`.

pub mod logging;
pub mod metrics;

pub use logging::{LogFormat, init_logging};
pub use metrics::init_metrics;
