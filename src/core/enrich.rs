//! Batch enrichment: attach resolved display names to reference fields

use std::collections::HashSet;

use tracing::debug;

use crate::core::cache::ReferenceStore;
use crate::core::resolver::{NameResolver, ResolvedNames};
use crate::core::upstream::Upstream;
use crate::entities::{Character, ReferenceRole};

/// Every reference URL across the batch, deduplicated in first-seen order
///
/// N characters sharing M distinct references yield M URLs, so the resolver
/// is asked about each reference once per batch.
pub fn collect_reference_urls(batch: &[Character]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for character in batch {
        for role in ReferenceRole::ALL {
            for url in character.references(role) {
                if !url.is_empty() && seen.insert(url) {
                    urls.push(url.to_string());
                }
            }
        }
    }
    urls
}

/// Rewrite every display field of `character` from its references and `names`
///
/// Unresolved references are dropped, never padded.
pub fn apply_names(character: &mut Character, names: &ResolvedNames) {
    for role in ReferenceRole::ALL {
        let resolved: Vec<String> = character
            .references(role)
            .into_iter()
            .filter_map(|url| names.get(url).cloned())
            .collect();
        character.set_display_names(role, resolved);
    }
}

/// Resolve the batch's references with one resolver call and attach the names
///
/// Never fails: partial upstream failure only means fewer names. Running it
/// again over its own output converges to the same records.
pub async fn enrich<U, S>(batch: &mut [Character], resolver: &NameResolver<'_, U, S>)
where
    U: Upstream + ?Sized,
    S: ReferenceStore,
{
    let urls = collect_reference_urls(batch);
    debug!(characters = batch.len(), references = urls.len(), "enriching batch");

    let names = resolver.resolve(&urls).await;
    for character in batch.iter_mut() {
        apply_names(character, &names);
    }
}
