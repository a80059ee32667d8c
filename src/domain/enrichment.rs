//! Enriched CVE records and CVSS severity classification

use serde::{Deserialize, Serialize};

/// Sentinel for fields no upstream source could populate.
pub const NOT_AVAILABLE: &str = "Not available";

/// Sentinel description for identifiers the CVE registry has rejected (404).
pub const NOT_PUBLISHED: &str = "Not published";

/// Discrete severity level derived from a CVSS base score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CvssLevel {
    Low,
    Medium,
    High,
    Critical,
    Unavailable,
}

impl CvssLevel {
    /// Classify a CVSS base score into a level.
    ///
    /// Total over all inputs; boundary values belong to the lower bucket,
    /// so 3.0 is `Low` and 6.0 is `Medium`.
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => CvssLevel::Unavailable,
            Some(s) if s <= 3.0 => CvssLevel::Low,
            Some(s) if s <= 6.0 => CvssLevel::Medium,
            Some(s) if s <= 8.0 => CvssLevel::High,
            Some(_) => CvssLevel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CvssLevel::Low => "Low",
            CvssLevel::Medium => "Medium",
            CvssLevel::High => "High",
            CvssLevel::Critical => "Critical",
            CvssLevel::Unavailable => NOT_AVAILABLE,
        }
    }

    /// Parse a level label back from an exported artifact.
    pub fn parse(label: &str) -> Self {
        match label {
            "Low" => CvssLevel::Low,
            "Medium" => CvssLevel::Medium,
            "High" => CvssLevel::High,
            "Critical" => CvssLevel::Critical,
            _ => CvssLevel::Unavailable,
        }
    }
}

impl std::fmt::Display for CvssLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One CVE identifier enriched from the CVE record and EPSS registries.
///
/// Every field holds either a real value or its documented sentinel; a record
/// is never partially constructed. `cvss_level` is derived from `cvss_score`
/// at construction time and the two cannot diverge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedCve {
    pub cve_id: String,
    pub description: String,
    pub cvss_score: Option<f64>,
    pub cvss_level: CvssLevel,
    pub cwe: String,
    pub epss_score: Option<f64>,
}

impl EnrichedCve {
    pub fn new(
        cve_id: impl Into<String>,
        description: String,
        cvss_score: Option<f64>,
        cwe: String,
        epss_score: Option<f64>,
    ) -> Self {
        Self {
            cve_id: cve_id.into(),
            description,
            cvss_level: CvssLevel::from_score(cvss_score),
            cvss_score,
            cwe,
            epss_score,
        }
    }

    /// A record carrying only sentinels, the starting point of enrichment.
    pub fn unavailable(cve_id: impl Into<String>) -> Self {
        Self::new(
            cve_id,
            NOT_AVAILABLE.to_string(),
            None,
            NOT_AVAILABLE.to_string(),
            None,
        )
    }
}
