//! Cache type definitions

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use thiserror::Error;

use crate::entities::Character;

/// Errors from the SQLite cache
#[derive(Debug, Error, Diagnostic)]
pub enum CacheError {
    #[error("cache database error: {0}")]
    #[diagnostic(
        code(swx::cache::sqlite),
        help("run `swx cache clear` to discard a corrupt cache")
    )]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to encode cached record: {0}")]
    #[diagnostic(code(swx::cache::encode))]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(swx::cache::io))]
    Io(#[from] std::io::Error),
}

/// Transactional key-value store behind the resolution pipeline
///
/// Two logical tables: characters by name (full-record blobs) and reference
/// names by URL.
pub trait ReferenceStore {
    /// Every cached character, in the order they were stored
    ///
    /// An empty or uninitialized store yields an empty list.
    fn load_all_entities(&self) -> Result<Vec<Character>, CacheError>;

    /// Atomically replace the cached character set
    fn replace_all_entities(&mut self, records: &[Character]) -> Result<(), CacheError>;

    /// Names for the requested URLs that are present; absent keys are omitted
    fn load_names(&self, urls: &[String]) -> Result<HashMap<String, String>, CacheError>;

    /// Upsert resolved names
    fn store_names(&mut self, names: &[(String, String)]) -> Result<(), CacheError>;
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_characters: usize,
    pub total_names: usize,
    pub last_refresh: Option<DateTime<Utc>>,
    pub db_size_bytes: u64,
}
