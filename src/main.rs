//! Backtest simulation CLI application.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;
use quant_config::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Flags win over the [logging] section
    let file_logging = load_config(&cli.config).ok().map(|c| c.logging);
    let log_level = match (&cli.log_level, &file_logging) {
        (Some(level), _) => level.as_str().to_string(),
        (None, Some(logging)) => logging.level.clone(),
        (None, None) => "info".to_string(),
    };
    let json_logs = cli.json_logs || file_logging.is_some_and(|l| l.is_json());
    setup_logging(&log_level, json_logs);

    match cli.command {
        Commands::Backtest(args) => cli::commands::backtest::run(args, &cli.config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
        Commands::ShowConfig => cli::commands::show::run(&cli.config).await,
    }
}
