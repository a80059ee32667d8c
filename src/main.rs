//! certwatch - Main application entry point

use clap::Parser;

use certwatch::cli::Cli;
use certwatch::config::validation::Validate;
use certwatch::{init_tracing, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // Only warn if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: failed to load .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    let config = Config::load().map_err(|e| {
        anyhow::anyhow!("failed to load configuration, check CERTWATCH__* env vars: {e}")
    })?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("configuration validation failed: {e}"))?;

    init_tracing(&config.logging).map_err(|e| anyhow::anyhow!("failed to init tracing: {e}"))?;

    cli.dispatch(&config).await
}
