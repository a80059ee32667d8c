//! certwatch - CERT-FR vulnerability intelligence pipeline
//!
//! Collects security bulletins from the CERT-FR RSS feeds, enriches the
//! CVE identifiers they reference against the CVE.org and FIRST EPSS
//! registries, consolidates bulletin and vulnerability data into a flat
//! report, and evaluates the result against an alerting threshold.
//!
//! The crate is organised in layers:
//!
//! - [`domain`]: core value types (bulletins, enriched CVEs, severity levels)
//! - [`application`]: enrichment, consolidation and alert evaluation services
//! - [`infrastructure`]: registry clients, feed parsing, CSV export, SMTP
//! - [`config`]: layered configuration with environment overrides

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
