//! Domain Layer - Core business types for the bulletin pipeline

pub mod bulletin;
pub mod consolidation;
pub mod enrichment;

pub use bulletin::{Bulletin, BulletinKind};
pub use consolidation::ConsolidatedRow;
pub use enrichment::{CvssLevel, EnrichedCve, NOT_AVAILABLE, NOT_PUBLISHED};
