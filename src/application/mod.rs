//! Application Layer - Pipeline use cases and shared error types

pub mod alerts;
pub mod consolidation;
pub mod enrichment;
pub mod errors;

pub use alerts::{AlertDecision, evaluate, EPSS_ALERT_THRESHOLD};
pub use consolidation::consolidate;
pub use enrichment::{EnrichmentService, Pacing};
pub use errors::{ApiError, ExportError, FeedError, MailError};
