//! CVE enrichment - single-identifier lookups and the paced batch orchestrator

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{EnrichedCve, NOT_AVAILABLE, NOT_PUBLISHED};
use crate::infrastructure::api_clients::{
    CveRecordClient, CveRecordLookup, ExploitScoreClient,
};

/// Fixed pacing delays for the two rate-limited registries.
///
/// `registry_delay` elapses between the CVE record call and the EPSS call for
/// one identifier; `identifier_delay` elapses between identifiers in a batch.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub registry_delay: Duration,
    pub identifier_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            registry_delay: Duration::from_millis(1000),
            identifier_delay: Duration::from_millis(1000),
        }
    }
}

impl Pacing {
    /// No delays, for tests and stub clients.
    pub fn none() -> Self {
        Self {
            registry_delay: Duration::ZERO,
            identifier_delay: Duration::ZERO,
        }
    }
}

/// Enriches CVE identifiers from the CVE record registry and the EPSS
/// exploit-probability registry.
///
/// Both registries are rate-limited by request cadence, so processing is
/// strictly sequential with fixed pacing delays. Every failure mode degrades
/// individual fields to their sentinels; `enrich` never fails.
pub struct EnrichmentService {
    records: Arc<dyn CveRecordClient>,
    epss: Arc<dyn ExploitScoreClient>,
    pacing: Pacing,
}

impl EnrichmentService {
    pub fn new(
        records: Arc<dyn CveRecordClient>,
        epss: Arc<dyn ExploitScoreClient>,
        pacing: Pacing,
    ) -> Self {
        Self {
            records,
            epss,
            pacing,
        }
    }

    /// Enrich one CVE identifier. Infallible by contract: every upstream
    /// failure leaves the affected fields at their sentinels.
    pub async fn enrich(&self, cve_id: &str) -> EnrichedCve {
        let mut description = NOT_AVAILABLE.to_string();
        let mut cvss_score = None;
        let mut cwe = NOT_AVAILABLE.to_string();

        match self.records.fetch(cve_id).await {
            Ok(CveRecordLookup::NotFound) => {
                tracing::info!(cve_id, "CVE not published in the record registry");
                description = NOT_PUBLISHED.to_string();
            }
            Ok(CveRecordLookup::Found(record)) => {
                match record.description {
                    Some(d) => description = d,
                    None => tracing::warn!(cve_id, "CVE record carries no description"),
                }
                cvss_score = record.cvss_score;
                if let Some(c) = record.cwe {
                    cwe = c;
                }
            }
            Err(e) => {
                tracing::warn!(cve_id, error = %e, "CVE record lookup failed");
            }
        }

        tokio::time::sleep(self.pacing.registry_delay).await;

        let epss_score = match self.epss.exploit_score(cve_id).await {
            Ok(Some(score)) => Some(score),
            Ok(None) => {
                tracing::info!(cve_id, "no EPSS result for identifier");
                None
            }
            Err(e) => {
                tracing::warn!(cve_id, error = %e, "EPSS lookup failed");
                None
            }
        };

        EnrichedCve::new(cve_id, description, cvss_score, cwe, epss_score)
    }

    /// Enrich a batch of identifiers sequentially, one output per input in
    /// input order, with the inter-identifier delay between items.
    pub async fn enrich_all(&self, cve_ids: &[String]) -> Vec<EnrichedCve> {
        let total = cve_ids.len();
        let mut results = Vec::with_capacity(total);

        for (idx, cve_id) in cve_ids.iter().enumerate() {
            tracing::info!(cve_id = %cve_id, "enriching CVE {}/{}", idx + 1, total);
            results.push(self.enrich(cve_id).await);

            if idx + 1 < total {
                tokio::time::sleep(self.pacing.identifier_delay).await;
            }
        }

        log_coverage(&results);
        results
    }
}

/// Log per-field coverage of an enriched batch.
fn log_coverage(records: &[EnrichedCve]) {
    let total = records.len();
    if total == 0 {
        return;
    }
    let with_desc = records
        .iter()
        .filter(|r| r.description != NOT_AVAILABLE && r.description != NOT_PUBLISHED)
        .count();
    let with_cvss = records.iter().filter(|r| r.cvss_score.is_some()).count();
    let with_cwe = records.iter().filter(|r| r.cwe != NOT_AVAILABLE).count();
    let with_epss = records.iter().filter(|r| r.epss_score.is_some()).count();

    tracing::info!(
        total,
        descriptions = with_desc,
        cvss = with_cvss,
        cwe = with_cwe,
        epss = with_epss,
        "enrichment coverage"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::ApiError;
    use crate::domain::CvssLevel;
    use crate::infrastructure::api_clients::CveRecord;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Stub record client mapping identifiers to canned outcomes.
    struct StubRecords {
        outcomes: HashMap<String, Result<CveRecordLookup, ApiError>>,
    }

    #[async_trait]
    impl CveRecordClient for StubRecords {
        async fn fetch(&self, cve_id: &str) -> Result<CveRecordLookup, ApiError> {
            match self.outcomes.get(cve_id) {
                Some(Ok(lookup)) => Ok(lookup.clone()),
                Some(Err(_)) | None => Err(ApiError::Http {
                    status: 500,
                    message: "stub failure".to_string(),
                }),
            }
        }
    }

    struct StubEpss {
        scores: HashMap<String, Option<f64>>,
        fail: bool,
    }

    #[async_trait]
    impl ExploitScoreClient for StubEpss {
        async fn exploit_score(&self, cve_id: &str) -> Result<Option<f64>, ApiError> {
            if self.fail {
                return Err(ApiError::Http {
                    status: 503,
                    message: "stub failure".to_string(),
                });
            }
            Ok(self.scores.get(cve_id).copied().flatten())
        }
    }

    fn service(
        outcomes: HashMap<String, Result<CveRecordLookup, ApiError>>,
        scores: HashMap<String, Option<f64>>,
        epss_fail: bool,
    ) -> EnrichmentService {
        EnrichmentService::new(
            Arc::new(StubRecords { outcomes }),
            Arc::new(StubEpss {
                scores,
                fail: epss_fail,
            }),
            Pacing::none(),
        )
    }

    fn found(description: Option<&str>, cvss: Option<f64>, cwe: Option<&str>) -> CveRecordLookup {
        CveRecordLookup::Found(CveRecord {
            description: description.map(String::from),
            cvss_score: cvss,
            cwe: cwe.map(String::from),
        })
    }

    #[tokio::test]
    async fn full_record_enriches_every_field() {
        let svc = service(
            HashMap::from([(
                "CVE-2024-0001".to_string(),
                Ok(found(Some("An overflow"), Some(9.1), Some("CWE-787"))),
            )]),
            HashMap::from([("CVE-2024-0001".to_string(), Some(0.7))]),
            false,
        );

        let rec = svc.enrich("CVE-2024-0001").await;
        assert_eq!(rec.description, "An overflow");
        assert_eq!(rec.cvss_score, Some(9.1));
        assert_eq!(rec.cvss_level, CvssLevel::Critical);
        assert_eq!(rec.cwe, "CWE-787");
        assert_eq!(rec.epss_score, Some(0.7));
    }

    #[tokio::test]
    async fn not_found_sets_not_published_but_still_queries_epss() {
        let svc = service(
            HashMap::from([("CVE-2024-0002".to_string(), Ok(CveRecordLookup::NotFound))]),
            HashMap::from([("CVE-2024-0002".to_string(), Some(0.1))]),
            false,
        );

        let rec = svc.enrich("CVE-2024-0002").await;
        assert_eq!(rec.description, NOT_PUBLISHED);
        assert!(rec.cvss_score.is_none());
        assert_eq!(rec.cvss_level, CvssLevel::Unavailable);
        assert_eq!(rec.cwe, NOT_AVAILABLE);
        assert_eq!(rec.epss_score, Some(0.1));
    }

    #[tokio::test]
    async fn transport_failure_leaves_defaults_in_place() {
        let svc = service(HashMap::new(), HashMap::new(), true);

        let rec = svc.enrich("CVE-2024-0003").await;
        assert_eq!(rec.description, NOT_AVAILABLE);
        assert!(rec.cvss_score.is_none());
        assert_eq!(rec.cwe, NOT_AVAILABLE);
        assert!(rec.epss_score.is_none());
        assert_eq!(rec.cvss_level, CvssLevel::Unavailable);
    }

    #[tokio::test]
    async fn partial_record_degrades_only_missing_fields() {
        let svc = service(
            HashMap::from([(
                "CVE-2024-0004".to_string(),
                Ok(found(None, Some(5.0), None)),
            )]),
            HashMap::new(),
            false,
        );

        let rec = svc.enrich("CVE-2024-0004").await;
        assert_eq!(rec.description, NOT_AVAILABLE);
        assert_eq!(rec.cvss_score, Some(5.0));
        assert_eq!(rec.cvss_level, CvssLevel::Medium);
        assert_eq!(rec.cwe, NOT_AVAILABLE);
        assert!(rec.epss_score.is_none());
    }

    #[tokio::test]
    async fn batch_preserves_length_and_order_despite_failures() {
        let svc = service(
            HashMap::from([(
                "CVE-2024-0001".to_string(),
                Ok(found(Some("ok"), Some(4.0), Some("CWE-79"))),
            )]),
            HashMap::new(),
            false,
        );

        let ids = vec![
            "CVE-2024-0001".to_string(),
            "CVE-2024-9999".to_string(),
            "CVE-2023-1234".to_string(),
        ];
        let results = svc.enrich_all(&ids).await;

        assert_eq!(results.len(), ids.len());
        for (rec, id) in results.iter().zip(&ids) {
            assert_eq!(&rec.cve_id, id);
        }
        assert_eq!(results[0].description, "ok");
        assert_eq!(results[1].description, NOT_AVAILABLE);
    }
}
