//! Alert command - re-evaluate an existing consolidated export

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::info;

use crate::application::evaluate;
use crate::config::Config;
use crate::infrastructure::export;
use crate::infrastructure::mailer::AlertMailer;

/// Arguments for the alert command
#[derive(Args, Debug)]
pub struct AlertArgs {
    /// Consolidated CSV to evaluate (defaults to the configured export path)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// EPSS threshold override
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Send the email even if alerting is disabled in the configuration
    #[arg(long)]
    pub send: bool,
}

pub async fn run(config: &Config, args: &AlertArgs) -> Result<()> {
    let path = args
        .input
        .as_deref()
        .unwrap_or(&config.export.consolidated_path);
    let rows = export::read_consolidated(path).context("reading consolidated export")?;
    info!(path = %path.display(), rows = rows.len(), "loaded consolidated export");

    let threshold = args.threshold.unwrap_or(config.alerts.epss_threshold);
    let decision = evaluate(&rows, threshold);

    if args.send || config.alerts.send_email {
        let mailer = AlertMailer::new(config.alerts.smtp.clone());
        mailer.send(&decision).await.context("sending alert email")?;
        info!(to = %config.alerts.smtp.to_address, "alert email sent");
    } else {
        println!("{}\n\n{}", decision.subject, decision.body);
    }

    Ok(())
}
