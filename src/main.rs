use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use promptvault::cli::Cli;
use promptvault::config::Config;
use promptvault::utils::error::report_error;

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    // Ensure configuration exists and load it
    let config = match &cli.config {
        Some(config_path) => Config::load_custom(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?,
        None => {
            Config::ensure_config_exists().context("Failed to create default config")?;
            Config::load().context("Failed to load config")?
        }
    };

    if !config.general.color {
        colored::control::set_override(false);
    }

    if let Err(e) = cli.command.execute(config).await {
        report_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
