// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::event::EventKind;

/// Command-line arguments for `checkdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "checkdag",
    version,
    about = "Run a DAG of CI check jobs when a repository event matches the configured triggers.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the pipeline config file (TOML).
    ///
    /// Default: `Checkdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Checkdag.toml")]
    pub config: String,

    /// Kind of repository event that occurred.
    #[arg(long, value_enum, value_name = "KIND", default_value = "push")]
    pub event: CliEventKind,

    /// Branch the event originated from (the pushed branch, or the
    /// pull-request source branch).
    #[arg(long, value_name = "BRANCH", required_unless_present = "dry_run")]
    pub branch: Option<String>,

    /// Branch a pull-request targets. Required for pull-request events.
    #[arg(long, value_name = "BRANCH")]
    pub target_branch: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CHECKDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print triggers and jobs, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Event kind as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CliEventKind {
    Push,
    PullRequest,
}

impl From<CliEventKind> for EventKind {
    fn from(kind: CliEventKind) -> Self {
        match kind {
            CliEventKind::Push => EventKind::Push,
            CliEventKind::PullRequest => EventKind::PullRequest,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
