use clap::Parser;
use tracing::debug;

use strikebook::adapter::inbound::cli::command::Cli;
use strikebook::adapter::inbound::cli::output::{self, OutputConfig};
use strikebook::adapter::inbound::cli::execute;
use strikebook::infrastructure::config::settings::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    config.init_logging();
    debug!(config = %cli.config.display(), "strikebook starting");

    if let Err(e) = execute(cli, config).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
