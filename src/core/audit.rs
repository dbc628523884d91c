//! Freshness audit for cached characters
//!
//! Flags records whose display fields lag their reference fields: rows
//! cached before a display field existed, or left incomplete by an earlier
//! enrichment run that lost some lookups. This is a repair trigger, not a
//! TTL check.

use crate::entities::{Character, ReferenceRole};

/// Roles of `character` with references but no resolved names
pub fn stale_roles(character: &Character) -> Vec<ReferenceRole> {
    ReferenceRole::ALL
        .into_iter()
        .filter(|role| {
            !character.references(*role).is_empty() && character.display_names(*role).is_empty()
        })
        .collect()
}

/// True if any record in the batch needs re-enrichment
pub fn needs_enrichment(batch: &[Character]) -> bool {
    batch.iter().any(|c| !stale_roles(c).is_empty())
}
