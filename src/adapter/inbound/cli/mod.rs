//! CLI module graph and command dispatch.

pub mod command;
pub mod context;
pub mod import;
pub mod output;
pub mod paths;
pub mod serve;
pub mod summary;

use command::{Cli, Commands};
use context::Context;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Run a parsed command against an already loaded configuration.
///
/// # Errors
/// Returns the first error raised by the command.
pub async fn execute(cli: Cli, config: Config) -> Result<()> {
    let ctx = Context::open(config, cli.db.as_deref())?;

    match cli.command {
        Commands::Summary(args) => summary::execute_summary(&ctx, &args.user).await,
        Commands::Refresh(args) => summary::execute_refresh(&ctx, &args.user).await,
        Commands::RecalculateAll => serve::execute_once(&ctx).await,
        Commands::Serve => serve::execute_serve(&ctx).await,
        Commands::Import(args) => import::execute(&ctx, &args.user, &args.file),
    }
}
