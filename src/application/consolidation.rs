//! Consolidation - joining bulletins against enriched CVE records

use std::collections::HashMap;

use crate::domain::{Bulletin, ConsolidatedRow, EnrichedCve};

/// Join bulletins against the enriched record set, emitting one row per
/// (bulletin, CVE) pair that has a matching enriched record.
///
/// A bulletin with no identifiers, or whose identifiers all miss the lookup,
/// contributes zero rows. Row order follows bulletin order, then identifier
/// order within a bulletin. The lookup is last-write-wins on duplicate
/// identifiers, which a well-formed enrichment batch never produces.
pub fn consolidate(bulletins: &[Bulletin], enriched: &[EnrichedCve]) -> Vec<ConsolidatedRow> {
    let by_id: HashMap<&str, &EnrichedCve> = enriched
        .iter()
        .map(|rec| (rec.cve_id.as_str(), rec))
        .collect();

    let mut rows = Vec::new();
    for bulletin in bulletins {
        for cve_id in &bulletin.cve_ids {
            match by_id.get(cve_id.as_str()) {
                Some(rec) => rows.push(ConsolidatedRow::from_parts(bulletin, rec)),
                None => {
                    tracing::debug!(cve_id = %cve_id, bulletin = %bulletin.title,
                        "no enriched record for identifier, row dropped");
                }
            }
        }
    }
    rows
}
