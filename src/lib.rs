//! `gazette` - lazy-loading named entity recognition service
//!
//! Serves a named-entity-recognition model over HTTP. The model is an
//! expensive, process-wide resource: [`handle::LazyResourceHandle`] loads
//! it once, on warmup or first use, and shares it with every request.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod handle;
pub mod model;
pub mod observability;
