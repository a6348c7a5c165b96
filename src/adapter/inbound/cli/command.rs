//! Command-line interface definitions.
//!
//! Defines the CLI structure for the strikebook application using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::paths;

/// Options trade journal analytics
#[derive(Parser, Debug)]
#[command(name = "strikebook")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Path to the SQLite database file (overrides config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the strikebook CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a user's analytics summary, recomputing it if stale
    Summary(UserArg),

    /// Recompute a user's analytics summary now
    Refresh(UserArg),

    /// Recompute every user's analytics summary once
    RecalculateAll,

    /// Recompute every user's summary on the configured schedule until Ctrl-C
    Serve,

    /// Import trades from a JSON file
    Import(ImportArgs),
}

/// Selects the journal user a command operates on.
#[derive(Parser, Debug)]
pub struct UserArg {
    /// Journal user identifier
    #[arg(short, long)]
    pub user: String,
}

/// Arguments for the `import` subcommand.
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Journal user the trades belong to
    #[arg(short, long)]
    pub user: String,

    /// JSON file holding an array of trades
    pub file: PathBuf,
}
