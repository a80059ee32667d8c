//! CSV export and reload of the pipeline's tabular artifacts
//!
//! Two artifacts: the enriched-record table (one row per CVE) and the
//! consolidated table (one row per bulletin/CVE pair, French headers).
//! Absent numeric fields are written as the "Not available" sentinel; on
//! reload the sentinel and a truly absent value collapse into absence, a
//! documented lossy boundary of the CSV format.

use std::path::Path;

use crate::application::errors::ExportError;
use crate::domain::{ConsolidatedRow, CvssLevel, EnrichedCve, NOT_AVAILABLE};

const ENRICHED_HEADERS: [&str; 6] = [
    "cve_id",
    "description",
    "cvss_score",
    "cwe",
    "epss_score",
    "cvss_level",
];

fn io_err(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn csv_err(path: &Path, source: csv::Error) -> ExportError {
    ExportError::Csv {
        path: path.display().to_string(),
        source,
    }
}

fn score_cell(score: Option<f64>) -> String {
    match score {
        Some(s) => s.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Write the enriched-record artifact.
pub fn write_enriched(path: &Path, records: &[EnrichedCve]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_err(path, e))?;

    writer
        .write_record(ENRICHED_HEADERS)
        .map_err(|e| csv_err(path, e))?;
    for rec in records {
        writer
            .write_record([
                rec.cve_id.as_str(),
                rec.description.as_str(),
                &score_cell(rec.cvss_score),
                rec.cwe.as_str(),
                &score_cell(rec.epss_score),
                rec.cvss_level.as_str(),
            ])
            .map_err(|e| csv_err(path, e))?;
    }

    writer
        .flush()
        .map_err(|e| io_err(path, e))?;
    tracing::info!(path = %path.display(), rows = records.len(), "wrote enriched artifact");
    Ok(())
}

/// Reload the enriched-record artifact.
pub fn read_enriched(path: &Path) -> Result<Vec<EnrichedCve>, ExportError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_err(path, e))?;
    let headers = reader.headers().map_err(|e| csv_err(path, e))?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let idx_id = column("cve_id");
    let idx_desc = column("description");
    let idx_cvss = column("cvss_score");
    let idx_cwe = column("cwe");
    let idx_epss = column("epss_score");

    let cell = |record: &csv::StringRecord, idx: Option<usize>| -> String {
        idx.and_then(|i| record.get(i))
            .unwrap_or(NOT_AVAILABLE)
            .to_string()
    };

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_err(path, e))?;
        let cvss_score: Option<f64> = cell(&row, idx_cvss).parse().ok();
        let epss_score: Option<f64> = cell(&row, idx_epss).parse().ok();
        records.push(EnrichedCve::new(
            cell(&row, idx_id),
            cell(&row, idx_desc),
            cvss_score,
            cell(&row, idx_cwe),
            epss_score,
        ));
    }
    Ok(records)
}

/// Write the consolidated artifact with its French headers.
pub fn write_consolidated(path: &Path, rows: &[ConsolidatedRow]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_err(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_err(path, e))?;
    }
    // serde-driven writers only emit headers once a row is written
    if rows.is_empty() {
        writer
            .write_record([
                "Titre du bulletin",
                "Type de bulletin",
                "Date de publication",
                "Identifiant CVE",
                "Score CVSS",
                "Level CVSS",
                "Base Severity",
                "Type CWE",
                "Score EPSS",
                "Lien du bulletin",
                "Description",
                "Éditeur/Vendor",
                "Produit",
                "Versions affectées",
            ])
            .map_err(|e| csv_err(path, e))?;
    }
    writer.flush().map_err(|e| io_err(path, e))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote consolidated artifact");
    Ok(())
}

/// Reload the consolidated artifact, tolerating missing columns.
pub fn read_consolidated(path: &Path) -> Result<Vec<ConsolidatedRow>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.map_err(|e| csv_err(path, e))?);
    }
    Ok(rows)
}
