// piiguard/src/cli.rs
//! This file defines the command-line interface (CLI) for the piiguard application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "piiguard",
    author = "piiguard contributors",
    version = env!("CARGO_PKG_VERSION"),
    about = "Detect PII spans in text",
    long_about = "piiguard detects personally identifiable information in free-form text. Independent recognizers (regex patterns and optional model servers) report scored spans, nearby context words raise confidence, and overlapping findings are reconciled into one non-overlapping result. Run it as an HTTP service or scan a file from the command line.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG to DEBUG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `piiguard` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serves the analyzer over HTTP.
    #[command(about = "Serve the analyzer over HTTP (POST /analyze).")]
    Serve(ServeCommand),

    /// Analyzes a file or stdin once and prints the detections as JSON.
    #[command(about = "Analyze a file or stdin and print the detections as JSON.")]
    Scan(ScanCommand),

    /// Lists the active recognizers.
    #[command(about = "List the active recognizers per language.")]
    Recognizers(RecognizersCommand),
}

/// Options shared by every command that builds an engine.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a custom recognizer configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "PIIGUARD_CONFIG", help = "Path to a custom recognizer configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Explicitly enable these recognizer names (comma-separated), including opt-in ones.
    #[arg(long = "enable", short = 'e', value_delimiter = ',', help = "Enable these recognizers (comma-separated), including opt-in ones.")]
    pub enable: Vec<String>,

    /// Explicitly disable these recognizer names (comma-separated).
    #[arg(long = "disable", short = 'x', value_delimiter = ',', help = "Disable these recognizers (comma-separated).")]
    pub disable: Vec<String>,
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Address to listen on.
    #[arg(long, value_name = "ADDR", env = "PIIGUARD_BIND", default_value = "0.0.0.0:3000", help = "Address to listen on.")]
    pub bind: String,

    /// Shared secret expected in the `x-api-key` header. Unset means no check.
    #[arg(long = "api-key", value_name = "KEY", env = "PIIGUARD_API_KEY", hide_env_values = true, help = "Require this value in the x-api-key header.")]
    pub api_key: Option<String>,

    /// Timeout for each external recognizer, in milliseconds.
    #[arg(long = "timeout-ms", value_name = "MS", env = "PIIGUARD_TIMEOUT_MS", help = "Per-request timeout for each external recognizer, in milliseconds.")]
    pub timeout_ms: Option<u64>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Language of the input.
    #[arg(long, short = 'l', default_value = "en", help = "Language code of the input.")]
    pub language: String,

    /// Entity types to report (comma-separated). Defaults to the configured set.
    #[arg(long, value_delimiter = ',', value_name = "TYPES", help = "Entity types to report (comma-separated).")]
    pub entities: Vec<String>,

    /// Pretty-print the JSON output.
    #[arg(long, help = "Pretty-print the JSON output.")]
    pub pretty: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `recognizers` command.
#[derive(Parser, Debug)]
pub struct RecognizersCommand {
    /// Print the list as JSON instead of a table.
    #[arg(long, help = "Print the list as JSON instead of a table.")]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}
