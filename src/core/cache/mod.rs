//! SQLite-backed reference cache
//!
//! This module provides a local SQLite cache that:
//! - Stores the last fetched character set, normalized and enriched
//! - Maps reference URLs to their resolved display names
//! - Supports direct SQL queries for power users
//!
//! Character rows are replaced wholesale on every refresh. Name rows survive
//! refreshes and are only dropped by [`ReferenceCache::clear`].

mod entities;
mod names;
mod schema;
mod types;

pub use types::*;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// Current schema version, recorded in `cache_meta`
const SCHEMA_VERSION: i32 = 1;

/// The reference cache backed by SQLite
pub struct ReferenceCache {
    conn: Connection,
    path: Option<PathBuf>,
}

impl ReferenceCache {
    /// Open or create the cache at `path`
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let mut cache = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Open a private in-memory cache (for testing)
    pub fn open_in_memory() -> Result<Self, CacheError> {
        let mut cache = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Database file, if this cache is on disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// When the character set was last replaced
    pub fn last_refresh(&self) -> Result<Option<DateTime<Utc>>, CacheError> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM cache_meta WHERE key = 'last_refresh'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.and_then(|s| parse_datetime(&s)))
    }

    /// Get cache statistics
    pub fn statistics(&self) -> Result<CacheStats, CacheError> {
        let total_characters: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM characters", [], |row| row.get(0))?;

        let total_names: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM reference_names", [], |row| row.get(0))?;

        let db_size_bytes = self
            .path
            .as_ref()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(CacheStats {
            total_characters,
            total_names,
            last_refresh: self.last_refresh()?,
            db_size_bytes,
        })
    }

    /// Execute raw SQL query (read-only)
    pub fn query_raw(&self, sql: &str) -> Result<Vec<Vec<String>>, CacheError> {
        let mut stmt = self.conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(CacheError::Sqlite(rusqlite::Error::InvalidQuery));
        }
        let column_count = stmt.column_count();

        let rows = stmt.query_map([], |row| {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value: String = row
                    .get::<_, rusqlite::types::Value>(i)
                    .map(|v| match v {
                        rusqlite::types::Value::Null => "NULL".to_string(),
                        rusqlite::types::Value::Integer(i) => i.to_string(),
                        rusqlite::types::Value::Real(f) => f.to_string(),
                        rusqlite::types::Value::Text(s) => s,
                        rusqlite::types::Value::Blob(_) => "<blob>".to_string(),
                    })
                    .unwrap_or_default();
                values.push(value);
            }
            Ok(values)
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Get column names for a query
    pub fn query_columns(&self, sql: &str) -> Result<Vec<String>, CacheError> {
        let stmt = self.conn.prepare(sql)?;
        Ok(stmt.column_names().iter().map(|s| s.to_string()).collect())
    }

    /// Clear the entire cache, names included
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.conn.execute_batch(
            r#"
            DELETE FROM characters;
            DELETE FROM reference_names;
            DELETE FROM cache_meta WHERE key = 'last_refresh';
            "#,
        )?;
        Ok(())
    }

    fn touch_last_refresh(tx: &rusqlite::Transaction<'_>) -> Result<(), CacheError> {
        tx.execute(
            "INSERT OR REPLACE INTO cache_meta (key, value) VALUES ('last_refresh', ?1)",
            params![Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

/// Parse an RFC 3339 timestamp stored in `cache_meta`
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
