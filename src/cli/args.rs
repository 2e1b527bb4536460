//! CLI argument definitions
//!
//! All Clap derive structs for `gazette` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Lazy-loading named entity recognition service.
#[derive(Parser, Debug)]
#[command(name = "gazette", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "GAZETTE_COLOR")]
    pub color: ColorChoice,

    /// Log line format.
    #[arg(long, default_value = "human", global = true, env = "GAZETTE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP service.
    Serve(ServeArgs),

    /// Extract entities from text once and print them as JSON.
    Extract(ExtractArgs),

    /// Validate the configuration and load the model once.
    Validate(ValidateArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "GAZETTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen on `[host:]port`, overriding the configuration.
    #[arg(long)]
    pub bind: Option<String>,

    /// Lexicon model file, overriding the configuration.
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Load the model on the first request instead of at startup.
    #[arg(long)]
    pub no_warmup: bool,

    /// Expose Prometheus metrics on `127.0.0.1:<port>`.
    #[arg(long, env = "GAZETTE_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for `extract`.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "GAZETTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Lexicon model file, overriding the configuration.
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Entity types to extract, comma separated.
    #[arg(short = 't', long = "types", value_delimiter = ',', required = true)]
    pub entity_types: Vec<String>,

    /// Confidence threshold (0.0-1.0); defaults to the configured value.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Text to analyze. Reads stdin when omitted or `-`.
    pub text: Option<String>,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "GAZETTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Lexicon model file, overriding the configuration.
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Only validate the configuration; do not load the model.
    #[arg(long)]
    pub skip_model: bool,

    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Shared Enums
// ============================================================================

/// Color output control.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Color when stderr is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always emit ANSI colors.
    Always,
    /// Never emit ANSI colors.
    Never,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Human,
    /// JSON.
    Json,
}
