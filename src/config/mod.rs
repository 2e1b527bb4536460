//! Configuration module
//!
//! Loading and validation of the `gazette` service configuration.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, Overrides};
pub use schema::*;
pub use validation::{ValidationResult, Validator, parse_load_timeout};
