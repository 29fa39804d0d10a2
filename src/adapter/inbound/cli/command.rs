//! Command-line interface definitions.
//!
//! Defines the CLI structure for tradewatch using `clap`: the long-running
//! monitor and a set of one-shot diagnostic checks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Trade status monitor forwarding new trades to a webhook
#[derive(Parser, Debug)]
#[command(name = "tradewatch")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monitor (foreground)
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `tradewatch check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration and print a summary
    Config(ConfigPathArg),
    /// Fetch the first page from the trade API
    Source(ConfigPathArg),
    /// Deliver a TRADE_TEST event to the webhook
    Webhook(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file (optional; environment alone also works)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file (optional; environment alone also works)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Do not start the HTTP control server
    #[arg(long)]
    pub no_server: bool,
}
