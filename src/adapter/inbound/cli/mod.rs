//! CLI module graph.

pub mod check;
pub mod command;
pub mod run;

pub use command::{CheckCommand, Cli, Commands};

use crate::error::Result;

/// Dispatch a parsed command line.
///
/// # Errors
/// Returns the first startup or check failure.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Check(CheckCommand::Config(arg)) => check::config::execute(&arg.config),
        Commands::Check(CheckCommand::Source(arg)) => check::source::execute(&arg.config).await,
        Commands::Check(CheckCommand::Webhook(arg)) => check::webhook::execute(&arg.config).await,
    }
}
