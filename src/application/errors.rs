//! Shared error types for the pipeline layers

use thiserror::Error;

/// Errors from the CVE record and EPSS registry clients.
///
/// None of these abort a batch: the enrichment service logs them and
/// degrades the affected fields to their sentinels.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Parse(String),
}

/// Errors from CERT-FR feed extraction.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    #[error("Malformed feed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Errors writing or reading the CSV artifacts.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Errors delivering an alert email.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
