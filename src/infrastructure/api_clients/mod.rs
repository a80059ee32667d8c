//! External registry API clients
//!
//! One client per registry: the CVE Program record service (canonical CVE
//! metadata) and the FIRST EPSS service (exploit probability). Both sit
//! behind object-safe traits so the enrichment service can be exercised with
//! stub clients.

pub mod cve_org;
pub mod epss;

pub use cve_org::CveOrgClient;
pub use epss::EpssClient;

use async_trait::async_trait;

use crate::application::errors::ApiError;

/// The fields the enrichment pipeline consumes from one CVE record.
/// Every field is optional: a missing nested step in the upstream document
/// yields `None` rather than an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CveRecord {
    pub description: Option<String>,
    pub cvss_score: Option<f64>,
    pub cwe: Option<String>,
}

/// Outcome of a CVE record lookup. `NotFound` is a regular outcome, not an
/// error: the registry simply has not published that identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum CveRecordLookup {
    NotFound,
    Found(CveRecord),
}

/// Lookup-by-identifier client for the canonical CVE record registry.
#[async_trait]
pub trait CveRecordClient: Send + Sync {
    async fn fetch(&self, cve_id: &str) -> Result<CveRecordLookup, ApiError>;
}

/// Lookup-by-identifier client for the exploit-probability registry.
#[async_trait]
pub trait ExploitScoreClient: Send + Sync {
    /// `Ok(None)` means the registry returned no result for the identifier.
    async fn exploit_score(&self, cve_id: &str) -> Result<Option<f64>, ApiError>;
}

/// Coerce a JSON value to f64, accepting numbers and numeric strings.
/// EPSS serves scores as strings; some CVE records do the same for CVSS.
pub(crate) fn value_to_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coercion_accepts_numbers_and_numeric_strings() {
        assert_eq!(value_to_f64(&json!(9.8)), Some(9.8));
        assert_eq!(value_to_f64(&json!(7)), Some(7.0));
        assert_eq!(value_to_f64(&json!("0.97")), Some(0.97));
        assert_eq!(value_to_f64(&json!(" 4.3 ")), Some(4.3));
    }

    #[test]
    fn coercion_rejects_everything_else() {
        assert_eq!(value_to_f64(&json!("Not available")), None);
        assert_eq!(value_to_f64(&json!(null)), None);
        assert_eq!(value_to_f64(&json!([1.0])), None);
        assert_eq!(value_to_f64(&json!({"score": 1.0})), None);
    }
}
