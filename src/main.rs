//! budget-dash CLI entry point.

use anyhow::Context;
use clap::Parser;

use budget_dash::cli::{self, Cli};
use budget_dash::infrastructure::config::ConfigLoader;
use budget_dash::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    // A missing .env is fine; the process environment still applies
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let json_mode = cli.json;

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config.context("Failed to load configuration") {
        Ok(config) => config,
        Err(err) => cli::handle_error(err, json_mode),
    };

    let logger = LogConfig::from_settings(&config.logging)
        .map(|log_config| log_config.verbose(cli.verbose))
        .and_then(|log_config| LoggerImpl::init(&log_config));
    let _logger = match logger {
        Ok(logger) => logger,
        Err(err) => cli::handle_error(err, json_mode),
    };

    if let Err(err) = cli::dispatch(cli, &config).await {
        cli::handle_error(err, json_mode);
    }
}
