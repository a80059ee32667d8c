//! Command-line interface for the bulletin pipeline
//!
//! Three entrypoints:
//! - `run`: the full collect / enrich / consolidate / alert pipeline
//! - `enrich`: ad-hoc enrichment of CVE identifiers given on the command line
//! - `alert`: re-evaluate an existing consolidated export against the threshold

pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::Config;

/// certwatch - CERT-FR bulletin collection and CVE enrichment
#[derive(Parser, Debug)]
#[command(
    name = "certwatch",
    version,
    about = "Collect CERT-FR security bulletins, enrich their CVEs and evaluate alerts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: feeds, enrichment, consolidation, alerting
    Run(commands::run::RunArgs),

    /// Enrich a list of CVE identifiers and write the enriched export
    Enrich(commands::enrich::EnrichArgs),

    /// Re-evaluate the consolidated export against the alert threshold
    Alert(commands::alert::AlertArgs),
}

impl Cli {
    pub async fn dispatch(self, config: &Config) -> anyhow::Result<()> {
        match self.command {
            Commands::Run(ref args) => commands::run::run(config, args).await,
            Commands::Enrich(ref args) => commands::enrich::run(config, args).await,
            Commands::Alert(ref args) => commands::alert::run(config, args).await,
        }
    }
}
