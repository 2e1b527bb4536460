//! Command-line interface
//!
//! Argument parsing and command handlers for the `gazette` binary.

pub mod args;
pub mod commands;
