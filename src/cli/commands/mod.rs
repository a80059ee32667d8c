pub mod alert;
pub mod enrich;
pub mod run;

use std::sync::Arc;

use anyhow::Context as _;

use crate::application::EnrichmentService;
use crate::config::Config;
use crate::infrastructure::api_clients::{CveOrgClient, EpssClient};

/// Build the enrichment service from the registry configuration.
pub(crate) fn enrichment_service(config: &Config) -> anyhow::Result<EnrichmentService> {
    let timeout = config.registries.timeout();
    let records = CveOrgClient::new(config.registries.cve_base_url.clone(), timeout)
        .context("building CVE registry client")?;
    let epss = EpssClient::new(config.registries.epss_base_url.clone(), timeout)
        .context("building EPSS client")?;

    Ok(EnrichmentService::new(
        Arc::new(records),
        Arc::new(epss),
        config.registries.pacing(),
    ))
}
