//! CERT-FR bulletin entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of CERT-FR publication a bulletin came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulletinKind {
    /// "Avis" feed: routine security advisories
    Advisory,
    /// "Alerte" feed: urgent alerts
    Alert,
}

impl std::fmt::Display for BulletinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BulletinKind::Advisory => write!(f, "Avis"),
            BulletinKind::Alert => write!(f, "Alerte"),
        }
    }
}

/// A published CERT-FR bulletin with the CVE identifiers it references.
///
/// Produced once by feed extraction and treated as immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bulletin {
    pub title: String,
    pub kind: BulletinKind,
    pub published: Option<DateTime<Utc>>,
    pub link: String,
    /// CVE identifiers found in the bulletin detail page, order-stable.
    pub cve_ids: Vec<String>,
}

impl Bulletin {
    pub fn new(
        title: impl Into<String>,
        kind: BulletinKind,
        published: Option<DateTime<Utc>>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            kind,
            published,
            link: link.into(),
            cve_ids: Vec::new(),
        }
    }

    pub fn with_cves(mut self, cve_ids: Vec<String>) -> Self {
        self.cve_ids = cve_ids;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_matches_feed_labels() {
        assert_eq!(BulletinKind::Advisory.to_string(), "Avis");
        assert_eq!(BulletinKind::Alert.to_string(), "Alerte");
    }
}
