//! CERT-FR RSS feed and bulletin-detail extraction
//!
//! Two feeds are polled: *avis* (advisories) and *alerte* (alerts). Each
//! bulletin's detail page is republished as JSON at `<link>/json/`; CVE
//! identifiers are collected from the structured `cves` array and from a
//! regex sweep over the raw document, since older bulletins only carry them
//! in prose.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use reqwest::Client;

use crate::application::errors::FeedError;
use crate::domain::{Bulletin, BulletinKind};

static CVE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CVE-\d{4}-\d{4,7}").expect("valid CVE regex"));

/// Feed extraction client for CERT-FR.
pub struct CertFrFeeds {
    client: Client,
    advisory_url: String,
    alert_url: String,
    /// Pause between bulletin-detail fetches, a load-shedding courtesy to the
    /// CERT-FR servers.
    detail_delay: Duration,
    /// Detail-fetch at most this many bulletins per run.
    max_bulletins: Option<usize>,
}

impl CertFrFeeds {
    pub fn new(
        advisory_url: String,
        alert_url: String,
        timeout: Duration,
        detail_delay: Duration,
        max_bulletins: Option<usize>,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("certwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FeedError::Network)?;

        Ok(Self {
            client,
            advisory_url,
            alert_url,
            detail_delay,
            max_bulletins,
        })
    }

    /// Fetch both feeds and populate each bulletin's CVE list from its
    /// detail page. A failed detail fetch leaves that bulletin's list empty
    /// and the run continues.
    pub async fn fetch_bulletins(&self) -> Result<Vec<Bulletin>, FeedError> {
        let mut bulletins = self
            .fetch_feed(&self.advisory_url, BulletinKind::Advisory)
            .await?;
        bulletins.extend(self.fetch_feed(&self.alert_url, BulletinKind::Alert).await?);

        tracing::info!(total = bulletins.len(), "fetched bulletin headers");

        let limit = self.max_bulletins.unwrap_or(bulletins.len());
        let total = bulletins.len().min(limit);

        for (idx, bulletin) in bulletins.iter_mut().take(limit).enumerate() {
            match self.fetch_cve_ids(&bulletin.link).await {
                Ok(cve_ids) => {
                    tracing::info!(
                        bulletin = %bulletin.title,
                        cves = cve_ids.len(),
                        "bulletin detail {}/{}",
                        idx + 1,
                        total
                    );
                    bulletin.cve_ids = cve_ids;
                }
                Err(e) => {
                    tracing::warn!(bulletin = %bulletin.title, error = %e,
                        "bulletin detail fetch failed, no CVEs collected");
                }
            }

            if idx + 1 < total {
                tokio::time::sleep(self.detail_delay).await;
            }
        }

        Ok(bulletins)
    }

    async fn fetch_feed(&self, url: &str, kind: BulletinKind) -> Result<Vec<Bulletin>, FeedError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Http {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        parse_feed(&body, kind)
    }

    async fn fetch_cve_ids(&self, bulletin_link: &str) -> Result<Vec<String>, FeedError> {
        let url = detail_json_url(bulletin_link);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Http {
                status: response.status().as_u16(),
                url,
            });
        }
        let body = response.text().await?;
        let structured = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        Ok(extract_cve_ids(&body, &structured))
    }
}

/// The JSON republication URL of a bulletin page.
fn detail_json_url(bulletin_link: &str) -> String {
    format!("{}/json/", bulletin_link.trim_end_matches('/'))
}

/// Parse an RSS document into bulletin headers (no CVEs yet).
fn parse_feed(xml: &str, kind: BulletinKind) -> Result<Vec<Bulletin>, FeedError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut bulletins = Vec::new();
    let mut in_item = false;
    let mut current_tag: Option<String> = None;
    let mut title = String::new();
    let mut link = String::new();
    let mut pub_date = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    pub_date.clear();
                    current_tag = None;
                } else if in_item {
                    current_tag = Some(name);
                }
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().to_string();
                    match current_tag.as_deref() {
                        Some("title") => title.push_str(&text),
                        Some("link") => link.push_str(&text),
                        Some("pubDate") => pub_date.push_str(&text),
                        _ => {}
                    }
                }
            }
            // Some feeds wrap element content in CDATA sections.
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(&e).to_string();
                    match current_tag.as_deref() {
                        Some("title") => title.push_str(&text),
                        Some("link") => link.push_str(&text),
                        Some("pubDate") => pub_date.push_str(&text),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" && in_item {
                    bulletins.push(Bulletin::new(
                        title.trim(),
                        kind,
                        parse_pub_date(pub_date.trim()),
                        link.trim(),
                    ));
                    in_item = false;
                }
                current_tag = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(bulletins)
}

/// RSS pubDate is RFC 2822; an unparseable date becomes `None`.
fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

/// Collect CVE identifiers from a bulletin detail document: the structured
/// `cves` array first, then a regex sweep over the raw body. Order-stable
/// dedup, structured entries first.
fn extract_cve_ids(raw_body: &str, structured: &serde_json::Value) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    if let Some(entries) = structured.get("cves").and_then(|v| v.as_array()) {
        for entry in entries {
            if let Some(name) = entry.get("name").and_then(|n| n.as_str()) {
                if seen.insert(name.to_string()) {
                    ids.push(name.to_string());
                }
            }
        }
    }

    for found in CVE_PATTERN.find_iter(raw_body) {
        if seen.insert(found.as_str().to_string()) {
            ids.push(found.as_str().to_string());
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FEED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>CERT-FR Avis</title>
    <item>
      <title>Multiples vulnérabilités dans le noyau Linux</title>
      <link>https://www.cert.ssi.gouv.fr/avis/CERTFR-2024-AVI-0001/</link>
      <pubDate>Fri, 05 Jan 2024 10:30:00 +0000</pubDate>
    </item>
    <item>
      <title>Vulnérabilité dans OpenSSL</title>
      <link>https://www.cert.ssi.gouv.fr/avis/CERTFR-2024-AVI-0002/</link>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_with_title_link_and_date() {
        let bulletins = parse_feed(FEED_XML, BulletinKind::Advisory).unwrap();

        assert_eq!(bulletins.len(), 2);
        assert_eq!(
            bulletins[0].title,
            "Multiples vulnérabilités dans le noyau Linux"
        );
        assert_eq!(
            bulletins[0].link,
            "https://www.cert.ssi.gouv.fr/avis/CERTFR-2024-AVI-0001/"
        );
        assert!(bulletins[0].published.is_some());
        assert_eq!(bulletins[0].kind, BulletinKind::Advisory);
        assert!(bulletins[0].cve_ids.is_empty());

        // Unparseable pubDate degrades to None, item is kept
        assert!(bulletins[1].published.is_none());
    }

    #[test]
    fn cdata_wrapped_elements_are_read() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <item>
      <title><![CDATA[Vulnérabilité dans Apache Tomcat]]></title>
      <link><![CDATA[https://www.cert.ssi.gouv.fr/alerte/CERTFR-2024-ALE-0001/]]></link>
      <pubDate>Fri, 05 Jan 2024 10:30:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

        let bulletins = parse_feed(xml, BulletinKind::Alert).unwrap();
        assert_eq!(bulletins.len(), 1);
        assert_eq!(bulletins[0].title, "Vulnérabilité dans Apache Tomcat");
        assert_eq!(
            bulletins[0].link,
            "https://www.cert.ssi.gouv.fr/alerte/CERTFR-2024-ALE-0001/"
        );
        assert!(bulletins[0].published.is_some());
    }

    #[test]
    fn detail_url_appends_json_segment() {
        assert_eq!(
            detail_json_url("https://www.cert.ssi.gouv.fr/avis/CERTFR-2024-AVI-0001/"),
            "https://www.cert.ssi.gouv.fr/avis/CERTFR-2024-AVI-0001/json/"
        );
        assert_eq!(
            detail_json_url("https://example.org/bulletin"),
            "https://example.org/bulletin/json/"
        );
    }

    #[test]
    fn structured_and_regex_identifiers_are_merged_without_duplicates() {
        let structured = json!({
            "cves": [
                {"name": "CVE-2024-1111", "url": "https://cve.org/..."},
                {"name": "CVE-2024-2222"}
            ]
        });
        let body = format!(
            "{} plus prose mentioning CVE-2024-2222 and CVE-2023-99999",
            structured
        );

        let ids = extract_cve_ids(&body, &structured);
        assert_eq!(
            ids,
            vec!["CVE-2024-1111", "CVE-2024-2222", "CVE-2023-99999"]
        );
    }

    #[test]
    fn regex_requires_four_to_seven_digits() {
        let structured = serde_json::Value::Null;
        let ids = extract_cve_ids("CVE-2024-123 CVE-2024-1234 CVE-2024-12345678", &structured);
        // Too-short suffix is rejected; the 8-digit run still contains a
        // valid 7-digit prefix match.
        assert!(ids.contains(&"CVE-2024-1234".to_string()));
        assert!(!ids.contains(&"CVE-2024-123".to_string()));
    }
}
