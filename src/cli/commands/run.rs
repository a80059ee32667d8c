//! Run command - full pipeline execution

use std::collections::HashSet;

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::info;

use crate::application::{consolidate, evaluate};
use crate::config::Config;
use crate::infrastructure::export;
use crate::infrastructure::feeds::CertFrFeeds;
use crate::infrastructure::mailer::AlertMailer;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Evaluate the alert but never send email, regardless of configuration
    #[arg(long)]
    pub no_email: bool,
}

pub async fn run(config: &Config, args: &RunArgs) -> Result<()> {
    let feeds = CertFrFeeds::new(
        config.feeds.advisory_url.clone(),
        config.feeds.alert_url.clone(),
        config.feeds.timeout(),
        config.feeds.detail_delay(),
        config.feeds.max_bulletins,
    )
    .context("building CERT-FR feed client")?;

    let bulletins = feeds
        .fetch_bulletins()
        .await
        .context("fetching CERT-FR bulletins")?;
    info!(count = bulletins.len(), "collected bulletins");

    // First occurrence wins so enrichment order follows bulletin order.
    let mut seen = HashSet::new();
    let mut cve_ids: Vec<String> = bulletins
        .iter()
        .flat_map(|b| b.cve_ids.iter())
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect();
    if let Some(max) = config.registries.max_cves {
        cve_ids.truncate(max);
    }
    info!(count = cve_ids.len(), "unique CVE identifiers to enrich");

    let service = super::enrichment_service(config)?;
    let enriched = service.enrich_all(&cve_ids).await;
    export::write_enriched(&config.export.enriched_path, &enriched)
        .context("writing enriched export")?;
    info!(path = %config.export.enriched_path.display(), "wrote enriched export");

    let rows = consolidate(&bulletins, &enriched);
    export::write_consolidated(&config.export.consolidated_path, &rows)
        .context("writing consolidated export")?;
    info!(
        path = %config.export.consolidated_path.display(),
        rows = rows.len(),
        "wrote consolidated export"
    );

    let decision = evaluate(&rows, config.alerts.epss_threshold);
    if decision.triggered {
        info!(subject = %decision.subject, "alert threshold exceeded");
    }

    if config.alerts.send_email && !args.no_email {
        let mailer = AlertMailer::new(config.alerts.smtp.clone());
        mailer.send(&decision).await.context("sending alert email")?;
        info!(to = %config.alerts.smtp.to_address, "alert email sent");
    } else {
        println!("{}\n\n{}", decision.subject, decision.body);
    }

    Ok(())
}
