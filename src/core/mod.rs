//! Core module - resolution, caching and upstream access

pub mod audit;
pub mod cache;
pub mod config;
pub mod enrich;
pub mod explorer;
pub mod pagination;
pub mod resolver;
pub mod sort;
pub mod units;
pub mod upstream;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheError, CacheStats, ReferenceCache, ReferenceStore};
pub use config::Config;
pub use explorer::{
    Explorer, ExplorerError, ListingSource, ResolveRequest, ResolvedReferences,
};
pub use resolver::{NameResolver, ResolveStats, ResolvedNames};
pub use sort::{sort_characters, SortField, SortOrder};
pub use upstream::{HttpUpstream, Upstream, UpstreamError};
