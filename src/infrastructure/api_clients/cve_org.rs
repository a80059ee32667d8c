//! CVE Program record API client
//!
//! Queries `https://cveawg.mitre.org/api/cve/{id}` for published CVE records
//! (CVE JSON 5.x). Extraction is tolerant by construction: every nested field
//! is optional, so a record missing any level degrades to `None` instead of
//! failing the lookup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{value_to_f64, CveRecord, CveRecordClient, CveRecordLookup};
use crate::application::errors::ApiError;

/// CVSS scheme containers in preference order, newest first.
///
/// The scan is scheme-major, not entry-major: a newer scheme anywhere in the
/// metrics list wins over an older scheme listed earlier. CNAs that publish
/// both v2 and v3 scores do not agree on entry order, so entry position is
/// not a signal.
const CVSS_SCHEME_PRIORITY: [&str; 3] = ["cvssV3_1", "cvssV3_0", "cvssV2_0"];

#[derive(Debug, Deserialize)]
struct CveResponse {
    containers: Option<Containers>,
}

#[derive(Debug, Deserialize)]
struct Containers {
    cna: Option<CnaContainer>,
}

#[derive(Debug, Deserialize, Default)]
struct CnaContainer {
    #[serde(default)]
    descriptions: Vec<DescriptionEntry>,
    /// Metric entries are heterogeneous (one scheme key per entry), kept as
    /// raw values and walked with the scheme priority list.
    #[serde(default)]
    metrics: Vec<serde_json::Value>,
    #[serde(default, rename = "problemTypes")]
    problem_types: Vec<ProblemType>,
}

#[derive(Debug, Deserialize)]
struct DescriptionEntry {
    value: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ProblemType {
    #[serde(default)]
    descriptions: Vec<ProblemTypeDescription>,
}

#[derive(Debug, Deserialize)]
struct ProblemTypeDescription {
    #[serde(rename = "cweId")]
    cwe_id: Option<String>,
}

/// Client for the CVE Program record registry.
pub struct CveOrgClient {
    client: Client,
    base_url: String,
}

impl CveOrgClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("certwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { client, base_url })
    }

    fn extract(response: CveResponse) -> CveRecord {
        let Some(cna) = response.containers.and_then(|c| c.cna) else {
            return CveRecord::default();
        };

        let description = cna
            .descriptions
            .first()
            .and_then(|entry| entry.value.clone());

        let cvss_score = CVSS_SCHEME_PRIORITY.iter().find_map(|scheme| {
            cna.metrics.iter().find_map(|metric| {
                metric
                    .get(scheme)
                    .and_then(|data| data.get("baseScore"))
                    .and_then(value_to_f64)
            })
        });

        let cwe = cna
            .problem_types
            .first()
            .and_then(|pt| pt.descriptions.first())
            .and_then(|desc| desc.cwe_id.clone());

        CveRecord {
            description,
            cvss_score,
            cwe,
        }
    }
}

#[async_trait]
impl CveRecordClient for CveOrgClient {
    async fn fetch(&self, cve_id: &str) -> Result<CveRecordLookup, ApiError> {
        let url = format!("{}/api/cve/{}", self.base_url, cve_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(CveRecordLookup::NotFound);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Http { status, message });
        }

        let parsed: CveResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(CveRecordLookup::Found(Self::extract(parsed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_from(value: serde_json::Value) -> CveRecord {
        CveOrgClient::extract(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn extracts_first_description_score_and_cwe() {
        let record = record_from(json!({
            "containers": {
                "cna": {
                    "descriptions": [
                        {"lang": "en", "value": "Buffer overflow in X"},
                        {"lang": "fr", "value": "Dépassement de tampon"}
                    ],
                    "metrics": [
                        {"cvssV3_1": {"baseScore": 9.8, "vectorString": "CVSS:3.1/..."}}
                    ],
                    "problemTypes": [
                        {"descriptions": [{"cweId": "CWE-787", "description": "OOB Write"}]}
                    ]
                }
            }
        }));

        assert_eq!(record.description.as_deref(), Some("Buffer overflow in X"));
        assert_eq!(record.cvss_score, Some(9.8));
        assert_eq!(record.cwe.as_deref(), Some("CWE-787"));
    }

    #[test]
    fn newest_scheme_wins_across_metric_entries() {
        let record = record_from(json!({
            "containers": {
                "cna": {
                    "metrics": [
                        {"cvssV2_0": {"baseScore": 5.0}},
                        {"cvssV3_1": {"baseScore": 8.8}}
                    ]
                }
            }
        }));
        assert_eq!(record.cvss_score, Some(8.8));

        let record = record_from(json!({
            "containers": {
                "cna": {
                    "metrics": [
                        {"cvssV2_0": {"baseScore": 5.0}},
                        {"cvssV3_0": {"baseScore": 7.5}}
                    ]
                }
            }
        }));
        assert_eq!(record.cvss_score, Some(7.5));
    }

    #[test]
    fn string_base_scores_are_coerced() {
        let record = record_from(json!({
            "containers": {
                "cna": {
                    "metrics": [{"cvssV3_1": {"baseScore": "6.1"}}]
                }
            }
        }));
        assert_eq!(record.cvss_score, Some(6.1));
    }

    #[test]
    fn missing_nested_fields_degrade_to_none() {
        let record = record_from(json!({"containers": {"cna": {}}}));
        assert_eq!(record, CveRecord::default());

        let record = record_from(json!({"containers": {}}));
        assert_eq!(record, CveRecord::default());

        let record = record_from(json!({
            "containers": {
                "cna": {
                    "problemTypes": [{"descriptions": [{"description": "no cweId here"}]}],
                    "metrics": [{"other": {"baseScore": 1.0}}]
                }
            }
        }));
        assert!(record.cwe.is_none());
        assert!(record.cvss_score.is_none());
    }

    #[tokio::test]
    async fn http_404_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/cve/CVE-2024-0001")
            .with_status(404)
            .create_async()
            .await;

        let client =
            CveOrgClient::new(server.url(), Duration::from_secs(5)).expect("client builds");
        let lookup = client.fetch("CVE-2024-0001").await.unwrap();

        mock.assert_async().await;
        assert_eq!(lookup, CveRecordLookup::NotFound);
    }

    #[tokio::test]
    async fn http_5xx_maps_to_http_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/cve/CVE-2024-0002")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client =
            CveOrgClient::new(server.url(), Duration::from_secs(5)).expect("client builds");
        let err = client.fetch("CVE-2024-0002").await.unwrap_err();

        mock.assert_async().await;
        match err {
            ApiError::Http { status, .. } => assert_eq!(status, 503),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
