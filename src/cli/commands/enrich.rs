//! Enrich command - ad-hoc enrichment of CVE identifiers

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::info;

use crate::config::Config;
use crate::infrastructure::export;

/// Arguments for the enrich command
#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// CVE identifiers to enrich (e.g. CVE-2024-3094)
    #[arg(required = true)]
    pub cve_ids: Vec<String>,

    /// Output path (defaults to the configured enriched export path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run(config: &Config, args: &EnrichArgs) -> Result<()> {
    let service = super::enrichment_service(config)?;
    let enriched = service.enrich_all(&args.cve_ids).await;

    let path = args
        .output
        .as_deref()
        .unwrap_or(&config.export.enriched_path);
    export::write_enriched(path, &enriched).context("writing enriched export")?;
    info!(path = %path.display(), count = enriched.len(), "wrote enriched export");

    for record in &enriched {
        println!(
            "{}\t{}\t{}\t{}",
            record.cve_id,
            record
                .cvss_score
                .map_or_else(|| "-".to_owned(), |s| format!("{s:.1}")),
            record.cvss_level,
            record
                .epss_score
                .map_or_else(|| "-".to_owned(), |s| format!("{s:.5}")),
        );
    }

    Ok(())
}
