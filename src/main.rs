//! UpliftXP CLI entry point.

use anyhow::Context;
use clap::Parser;

use upliftxp::cli::{handle_error, run, Cli};
use upliftxp::infrastructure::config::ConfigLoader;
use upliftxp::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    let config = match ConfigLoader::load().context("Failed to load configuration") {
        Ok(config) => config,
        Err(err) => handle_error(err, json_mode),
    };

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    if let Err(err) = run(cli, &config).await {
        handle_error(err, json_mode);
    }
}
