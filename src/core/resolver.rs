//! Cache-first name resolution for reference URLs
//!
//! Cached names are served from the store; every miss is fetched from the
//! upstream concurrently, one request per URL. Fetches are joined before
//! anything is written back, so the store is never touched from more than
//! one place at a time.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::cache::ReferenceStore;
use crate::core::upstream::Upstream;

/// Resolved names keyed by reference URL
///
/// Always a subset of the requested URLs; a missing key means the reference
/// could not be resolved and should be omitted downstream.
pub type ResolvedNames = HashMap<String, String>;

/// Counters from one resolution call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub requested: usize,
    pub cache_hits: usize,
    pub fetched: usize,
    pub failed: usize,
}

/// Resolves reference URLs to display names
pub struct NameResolver<'a, U: Upstream + ?Sized, S: ReferenceStore> {
    upstream: &'a U,
    store: &'a Mutex<S>,
    max_concurrent: usize,
}

impl<'a, U: Upstream + ?Sized, S: ReferenceStore> NameResolver<'a, U, S> {
    pub fn new(upstream: &'a U, store: &'a Mutex<S>, max_concurrent: usize) -> Self {
        Self {
            upstream,
            store,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Resolve `urls`, consulting the store first and fetching only misses
    pub async fn resolve(&self, urls: &[String]) -> ResolvedNames {
        self.resolve_with_stats(urls).await.0
    }

    /// Like [`resolve`](Self::resolve), also reporting hit/miss counters
    pub async fn resolve_with_stats(&self, urls: &[String]) -> (ResolvedNames, ResolveStats) {
        let urls = dedup(urls);
        let mut stats = ResolveStats {
            requested: urls.len(),
            ..Default::default()
        };
        if urls.is_empty() {
            return (ResolvedNames::new(), stats);
        }

        let mut names = self.cached_names(&urls);
        stats.cache_hits = names.len();

        let missing: Vec<&String> = urls.iter().filter(|u| !names.contains_key(*u)).collect();
        debug!(
            requested = stats.requested,
            cached = stats.cache_hits,
            missing = missing.len(),
            "resolving reference names"
        );

        // Fan out, then join; `buffered` keeps results in input order
        let fetched: Vec<(&String, Option<String>)> = stream::iter(missing)
            .map(|url| async move { (url, self.fetch_name(url).await) })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut new_names = Vec::new();
        for (url, name) in fetched {
            match name {
                Some(name) => new_names.push((url.clone(), name)),
                None => stats.failed += 1,
            }
        }
        stats.fetched = new_names.len();

        self.persist(&new_names);
        names.extend(new_names);

        (names, stats)
    }

    fn cached_names(&self, urls: &[String]) -> ResolvedNames {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        match store.load_names(urls) {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "name cache unavailable; fetching every reference");
                ResolvedNames::new()
            }
        }
    }

    fn persist(&self, names: &[(String, String)]) {
        if names.is_empty() {
            return;
        }
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = store.store_names(names) {
            warn!(error = %e, count = names.len(), "failed to persist resolved names");
        }
    }

    /// Fetch one resource and pull out its display name; failures yield `None`
    async fn fetch_name(&self, url: &str) -> Option<String> {
        match self.upstream.fetch_json(url).await {
            Ok(body) => {
                let name = display_name(&body);
                if name.is_none() {
                    warn!(%url, "reference has neither `name` nor `title`");
                }
                name
            }
            Err(e) => {
                warn!(%url, error = %e, "reference lookup failed");
                None
            }
        }
    }
}

/// `name` if present and non-empty, otherwise `title`
pub fn display_name(body: &Value) -> Option<String> {
    ["name", "title"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Drop duplicates and empty strings, keeping first-seen order
pub(crate) fn dedup(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter(|u| !u.is_empty())
        .filter(|u| seen.insert(u.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::ReferenceCache;
    use crate::core::testing::ScriptedUpstream;
    use serde_json::json;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn store_with(names: &[(&str, &str)]) -> Mutex<ReferenceCache> {
        let mut cache = ReferenceCache::open_in_memory().unwrap();
        let pairs: Vec<_> = names
            .iter()
            .map(|(u, n)| (u.to_string(), n.to_string()))
            .collect();
        cache.store_names(&pairs).unwrap();
        Mutex::new(cache)
    }

    #[test]
    fn test_display_name_prefers_name_then_title() {
        assert_eq!(display_name(&json!({"name": "Tatooine"})).as_deref(), Some("Tatooine"));
        assert_eq!(
            display_name(&json!({"title": "A New Hope"})).as_deref(),
            Some("A New Hope")
        );
        assert_eq!(
            display_name(&json!({"name": "", "title": "Fallback"})).as_deref(),
            Some("Fallback")
        );
        assert_eq!(display_name(&json!({"name": 42})), None);
        assert_eq!(display_name(&json!({})), None);
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        assert_eq!(dedup(&urls(&["b", "a", "b", "", "c", "a"])), urls(&["b", "a", "c"]));
    }

    #[tokio::test]
    async fn test_cached_name_needs_no_fetch() {
        let upstream = ScriptedUpstream::new();
        let store = store_with(&[("u1", "Tatooine")]);

        let names = NameResolver::new(&upstream, &store, 4)
            .resolve(&urls(&["u1"]))
            .await;

        assert_eq!(names.get("u1").map(String::as_str), Some("Tatooine"));
        assert_eq!(upstream.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_fetches_only_misses_and_persists_them() {
        let upstream = ScriptedUpstream::new()
            .with_name("u2", "Alderaan")
            .with_json("f1", json!({"title": "A New Hope"}));
        let store = store_with(&[("u1", "Tatooine")]);

        let (names, stats) = NameResolver::new(&upstream, &store, 4)
            .resolve_with_stats(&urls(&["u1", "u2", "f1"]))
            .await;

        assert_eq!(names.len(), 3);
        assert_eq!(names["f1"], "A New Hope");
        assert_eq!(upstream.calls("u1"), 0);
        assert_eq!(upstream.calls("u2"), 1);
        assert_eq!(
            stats,
            ResolveStats {
                requested: 3,
                cache_hits: 1,
                fetched: 2,
                failed: 0
            }
        );

        let persisted = store.lock().unwrap().load_names(&urls(&["u2", "f1"])).unwrap();
        assert_eq!(persisted.len(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_omitted_and_not_cached() {
        let upstream = ScriptedUpstream::new()
            .with_name("ok", "Yavin IV")
            .with_status("rejected", 500)
            .with_unreachable("down")
            .with_json("nameless", json!({"id": 7}));
        let store = store_with(&[]);

        let (names, stats) = NameResolver::new(&upstream, &store, 2)
            .resolve_with_stats(&urls(&["ok", "rejected", "down", "nameless"]))
            .await;

        assert_eq!(names.len(), 1);
        assert!(names.contains_key("ok"));
        assert_eq!(stats.failed, 3);
        assert_eq!(store.lock().unwrap().all_names().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_reference_is_retried_next_call() {
        let upstream = ScriptedUpstream::new().with_status("u1", 503);
        let store = store_with(&[]);
        let resolver = NameResolver::new(&upstream, &store, 4);

        assert!(resolver.resolve(&urls(&["u1"])).await.is_empty());
        assert!(resolver.resolve(&urls(&["u1"])).await.is_empty());
        assert_eq!(upstream.calls("u1"), 2);
    }

    #[tokio::test]
    async fn test_duplicate_input_fetches_once() {
        let upstream = ScriptedUpstream::new().with_name("u1", "Tatooine");
        let store = store_with(&[]);

        let names = NameResolver::new(&upstream, &store, 4)
            .resolve(&urls(&["u1", "u1", "u1"]))
            .await;

        assert_eq!(names.len(), 1);
        assert_eq!(upstream.calls("u1"), 1);
    }

    #[tokio::test]
    async fn test_empty_input_does_nothing() {
        let upstream = ScriptedUpstream::new();
        let store = store_with(&[]);

        let names = NameResolver::new(&upstream, &store, 4).resolve(&[]).await;

        assert!(names.is_empty());
        assert_eq!(upstream.total_calls(), 0);
    }
}
