//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured output and errors).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

pub fn json_mode() -> bool {
    JSON_MODE.get().copied().unwrap_or(false)
}

#[derive(Parser, Debug)]
#[command(name = "eclean", version, about = "E-Cleaning device panel")]
pub struct Cli {
    /// Path to config TOML (built-in defaults when omitted)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Optional produce clean-time CSV (strict `produce,seconds` header)
    #[arg(long = "produce-csv", value_name = "FILE")]
    pub produce_csv: Option<PathBuf>,

    /// Print screens, acknowledgments and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive session: pairing screen, then the device panel
    Run {
        /// Read panel commands from FILE instead of stdin
        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,
        /// Append panel events to FILE as well as the in-memory log
        #[arg(long = "event-log", value_name = "FILE")]
        event_log: Option<PathBuf>,
    },
    /// List produce options with clean time and conveyor rpm
    Produce,
    /// Load and validate the configuration
    SelfCheck,
}
