//! Alert evaluation - deciding whether the consolidated table warrants an alert

use crate::domain::ConsolidatedRow;

/// Default EPSS probability above which a row counts as critical.
pub const EPSS_ALERT_THRESHOLD: f64 = 0.5;

/// Outcome of one alert evaluation: the report content handed to the mailer.
/// Lives for a single evaluation, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    /// True when at least one row crossed the exploit-probability threshold.
    pub triggered: bool,
    pub subject: String,
    pub body: String,
}

/// Inspect the consolidated rows and build the report content.
///
/// Empty input yields an informational "no bulletins" notice. Rows whose EPSS
/// score exceeds `threshold` turn the decision into an alert listing those
/// rows; otherwise the body is a plain report over all rows. Listings keep
/// row order.
pub fn evaluate(rows: &[ConsolidatedRow], threshold: f64) -> AlertDecision {
    if rows.is_empty() {
        return AlertDecision {
            triggered: false,
            subject: "CERT-FR security bulletin report".to_string(),
            body: "No bulletins in the consolidated dataset.".to_string(),
        };
    }

    let critical: Vec<&ConsolidatedRow> = rows
        .iter()
        .filter(|row| row.epss_numeric().is_some_and(|s| s > threshold))
        .collect();

    if !critical.is_empty() {
        let listing = render_listing(
            &["Titre du bulletin", "Identifiant CVE", "Score EPSS"],
            critical.iter().map(|row| {
                vec![
                    row.bulletin_title.clone(),
                    row.cve_id.clone(),
                    row.epss_score.clone(),
                ]
            }),
        );
        AlertDecision {
            triggered: true,
            subject: "Alert: critical vulnerabilities detected".to_string(),
            body: format!(
                "Total rows: {}\nCritical CVEs: {}\n\nDetails:\n{}",
                rows.len(),
                critical.len(),
                listing
            ),
        }
    } else {
        let listing = render_listing(
            &["Titre du bulletin", "Date de publication", "Type de bulletin"],
            rows.iter().map(|row| {
                vec![
                    row.bulletin_title.clone(),
                    row.published.clone(),
                    row.bulletin_kind.clone(),
                ]
            }),
        );
        AlertDecision {
            triggered: false,
            subject: "CERT-FR security bulletin report".to_string(),
            body: format!("Total rows: {}\n\nOverview:\n{}", rows.len(), listing),
        }
    }
}

/// Render a column-aligned plain-text listing.
fn render_listing<I>(headers: &[&str], rows: I) -> String
where
    I: Iterator<Item = Vec<String>>,
{
    let rows: Vec<Vec<String>> = rows.collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let render_line = |cells: Vec<String>, widths: &[usize]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = w))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    out.push_str(&render_line(
        headers.iter().map(|h| h.to_string()).collect(),
        &widths,
    ));
    for row in rows {
        out.push('\n');
        out.push_str(&render_line(row, &widths));
    }
    out
}
