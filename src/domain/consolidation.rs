//! Consolidated (bulletin, CVE) rows - the pipeline's primary tabular artifact

use serde::{Deserialize, Serialize};

use super::enrichment::NOT_AVAILABLE;
use super::{Bulletin, EnrichedCve};

/// One row of the consolidated table: a bulletin joined with one of its
/// enriched CVEs. Field names are serde-renamed to the French export headers,
/// which are fixed as the external interface of the artifact.
///
/// `base_severity`, `vendor`, `product` and `affected_versions` are reserved
/// for future enrichment sources and always carry the sentinel here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedRow {
    #[serde(rename = "Titre du bulletin", default)]
    pub bulletin_title: String,
    #[serde(rename = "Type de bulletin", default)]
    pub bulletin_kind: String,
    #[serde(rename = "Date de publication", default)]
    pub published: String,
    #[serde(rename = "Identifiant CVE", default)]
    pub cve_id: String,
    #[serde(rename = "Score CVSS", default)]
    pub cvss_score: String,
    #[serde(rename = "Level CVSS", default)]
    pub cvss_level: String,
    #[serde(rename = "Base Severity", default)]
    pub base_severity: String,
    #[serde(rename = "Type CWE", default)]
    pub cwe: String,
    #[serde(rename = "Score EPSS", default)]
    pub epss_score: String,
    #[serde(rename = "Lien du bulletin", default)]
    pub bulletin_link: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Éditeur/Vendor", default)]
    pub vendor: String,
    #[serde(rename = "Produit", default)]
    pub product: String,
    #[serde(rename = "Versions affectées", default)]
    pub affected_versions: String,
}

impl ConsolidatedRow {
    /// Join one bulletin with one of its enriched CVE records.
    pub fn from_parts(bulletin: &Bulletin, enriched: &EnrichedCve) -> Self {
        Self {
            bulletin_title: bulletin.title.clone(),
            bulletin_kind: bulletin.kind.to_string(),
            published: bulletin
                .published
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            cve_id: enriched.cve_id.clone(),
            cvss_score: format_score(enriched.cvss_score),
            cvss_level: enriched.cvss_level.to_string(),
            base_severity: NOT_AVAILABLE.to_string(),
            cwe: enriched.cwe.clone(),
            epss_score: format_score(enriched.epss_score),
            bulletin_link: bulletin.link.clone(),
            description: enriched.description.clone(),
            vendor: NOT_AVAILABLE.to_string(),
            product: NOT_AVAILABLE.to_string(),
            affected_versions: NOT_AVAILABLE.to_string(),
        }
    }

    /// EPSS score parsed back to a number, if the row carries one.
    pub fn epss_numeric(&self) -> Option<f64> {
        self.epss_score.parse().ok()
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => s.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}
