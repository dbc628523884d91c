//! Top-level orchestration: cached character listing and ad-hoc resolution
//!
//! ```text
//! get_characters(force_refresh)
//!   ├─ cache non-empty, no refresh ─ audit ─┬─ fresh ─────────────── serve cache
//!   │                                       └─ gaps ── enrich ─ rewrite cache
//!   └─ cache empty or refresh ─ paginate ─ normalize ─ enrich ─ rewrite cache
//! ```

use std::sync::{Mutex, PoisonError};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::audit;
use crate::core::cache::{CacheError, ReferenceCache, ReferenceStore};
use crate::core::config::Config;
use crate::core::enrich::enrich;
use crate::core::pagination::PageFetcher;
use crate::core::resolver::NameResolver;
use crate::core::units::{dedup_by_name, normalize_character};
use crate::core::upstream::{HttpUpstream, Upstream, UpstreamError};
use crate::entities::Character;

/// Failures of a character listing request
///
/// Listing failures are fatal to the request. Reference lookups never show
/// up here; they only leave display names empty.
#[derive(Debug, Error, Diagnostic)]
pub enum ExplorerError {
    #[error("SWAPI returned an error: {status}")]
    #[diagnostic(
        code(swx::upstream::rejected),
        help("the upstream rejected the listing request ({url}); retry later or check base_url")
    )]
    UpstreamRejected { url: String, status: u16 },

    #[error("Unable to reach SWAPI. Please try again shortly. ({message})")]
    #[diagnostic(
        code(swx::upstream::unreachable),
        help("check the network connection and base_url ({url}); raise timeout_secs if SWAPI is slow")
    )]
    UpstreamUnreachable { url: String, message: String },

    #[error("SWAPI sent an unreadable listing: {message}")]
    #[diagnostic(code(swx::upstream::malformed), help("offending page: {url}"))]
    UpstreamMalformed { url: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Cache(#[from] CacheError),
}

impl ExplorerError {
    /// HTTP status a gateway in front of the explorer should answer with
    pub fn gateway_status(&self) -> u16 {
        match self {
            ExplorerError::UpstreamRejected { .. } => 502,
            ExplorerError::UpstreamUnreachable { .. } => 504,
            ExplorerError::UpstreamMalformed { .. } => 502,
            ExplorerError::Cache(_) => 500,
        }
    }
}

impl From<UpstreamError> for ExplorerError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Rejected { url, status } => {
                ExplorerError::UpstreamRejected { url, status }
            }
            UpstreamError::Unreachable { url, message } => {
                ExplorerError::UpstreamUnreachable { url, message }
            }
            UpstreamError::Malformed { url, message } => {
                ExplorerError::UpstreamMalformed { url, message }
            }
        }
    }
}

/// Reference URLs to resolve, grouped by role
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolveRequest {
    pub homeworld: Option<String>,
    pub films: Vec<String>,
    pub species: Vec<String>,
    pub starships: Vec<String>,
    pub vehicles: Vec<String>,
}

impl ResolveRequest {
    fn into_character(self) -> Character {
        Character {
            homeworld: self.homeworld.filter(|u| !u.is_empty()),
            films: self.films,
            species: self.species,
            starships: self.starships,
            vehicles: self.vehicles,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.homeworld.is_none()
            && self.films.is_empty()
            && self.species.is_empty()
            && self.starships.is_empty()
            && self.vehicles.is_empty()
    }
}

/// Resolved names grouped by role; unresolved references are omitted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedReferences {
    pub homeworld_name: Option<String>,
    pub film_titles: Vec<String>,
    pub species_names: Vec<String>,
    pub starship_names: Vec<String>,
    pub vehicle_names: Vec<String>,
}

impl From<Character> for ResolvedReferences {
    fn from(c: Character) -> Self {
        Self {
            homeworld_name: c.homeworld_name,
            film_titles: c.film_titles,
            species_names: c.species_names,
            starship_names: c.starship_names,
            vehicle_names: c.vehicle_names,
        }
    }
}

/// Where a listing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
    /// Served from cache as-is
    Cache,
    /// Served from cache after re-enriching records with gaps
    Repaired,
    /// Fetched from upstream
    Upstream,
}

/// Cached, self-repairing view over the upstream character listing
pub struct Explorer<U: Upstream, S: ReferenceStore = ReferenceCache> {
    config: Config,
    upstream: U,
    store: Mutex<S>,
    /// Serializes refresh cycles so concurrent callers cannot interleave rewrites
    refresh_lock: tokio::sync::Mutex<()>,
}

impl Explorer<HttpUpstream, ReferenceCache> {
    /// Production explorer: HTTP upstream and on-disk cache from `config`
    pub fn open(config: Config) -> Result<Self, ExplorerError> {
        let upstream = HttpUpstream::new(&config)?;
        let cache = ReferenceCache::open(&config.cache_path())?;
        Ok(Self::new(config, upstream, cache))
    }
}

impl<U: Upstream, S: ReferenceStore> Explorer<U, S> {
    pub fn new(config: Config, upstream: U, store: S) -> Self {
        Self {
            config,
            upstream,
            store: Mutex::new(store),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    /// Run `f` against the store; the lock is released before returning
    pub fn with_store<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    fn resolver(&self) -> NameResolver<'_, U, S> {
        NameResolver::new(
            &self.upstream,
            &self.store,
            self.config.max_concurrent_fetches,
        )
    }

    /// Normalized, enriched characters
    ///
    /// Serves the cache unless it is empty or `force_refresh` is set. A cached
    /// set with unresolved display fields is re-enriched and rewritten first.
    pub async fn get_characters(&self, force_refresh: bool) -> Result<Vec<Character>, ExplorerError> {
        self.get_characters_with_source(force_refresh)
            .await
            .map(|(characters, _)| characters)
    }

    /// Like [`get_characters`](Self::get_characters), also reporting where the data came from
    pub async fn get_characters_with_source(
        &self,
        force_refresh: bool,
    ) -> Result<(Vec<Character>, ListingSource), ExplorerError> {
        let _refresh = self.refresh_lock.lock().await;

        if !force_refresh {
            let mut cached = self.with_store(|s| s.load_all_entities())?;
            if !cached.is_empty() {
                if !audit::needs_enrichment(&cached) {
                    debug!(count = cached.len(), "serving characters from cache");
                    return Ok((cached, ListingSource::Cache));
                }

                info!(count = cached.len(), "cached characters have unresolved references; repairing");
                enrich(&mut cached, &self.resolver()).await;
                self.with_store(|s| s.replace_all_entities(&cached))?;
                return Ok((cached, ListingSource::Repaired));
            }
        }

        let listing_url = self.config.people_url();
        info!(url = %listing_url, force_refresh, "refreshing characters from upstream");
        let walk = PageFetcher::new(&self.upstream, self.config.max_pages)
            .fetch_all(&listing_url)
            .await?;

        let mut characters = dedup_by_name(walk.results.iter().map(normalize_character).collect());
        enrich(&mut characters, &self.resolver()).await;
        self.with_store(|s| s.replace_all_entities(&characters))?;

        info!(
            count = characters.len(),
            pages = walk.pages,
            truncated = walk.truncated,
            "character cache refreshed"
        );
        Ok((characters, ListingSource::Upstream))
    }

    /// Resolve ad-hoc references outside any cached batch
    ///
    /// Best effort: anything that cannot be resolved is simply absent.
    pub async fn resolve_references(&self, request: ResolveRequest) -> ResolvedReferences {
        let mut carrier = request.into_character();
        enrich(std::slice::from_mut(&mut carrier), &self.resolver()).await;
        ResolvedReferences::from(carrier)
    }
}
