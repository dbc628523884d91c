//! Database schema initialization

use rusqlite::params;

use super::{CacheError, ReferenceCache, SCHEMA_VERSION};

impl ReferenceCache {
    /// Initialize database schema
    ///
    /// Tables are created if missing and never altered. Character rows are
    /// JSON blobs, so new fields are filled with defaults on read instead of
    /// by a migration.
    pub(super) fn init_schema(&mut self) -> Result<(), CacheError> {
        self.conn.execute_batch(
            r#"
            -- Normalized, enriched characters; replaced wholesale on refresh
            CREATE TABLE IF NOT EXISTS characters (
                name TEXT PRIMARY KEY,
                position INTEGER NOT NULL,
                record TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_characters_position ON characters(position);

            -- Resolved reference names; rows are never invalidated
            CREATE TABLE IF NOT EXISTS reference_names (
                url TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );

            -- Cache metadata
            CREATE TABLE IF NOT EXISTS cache_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        self.conn.execute(
            "INSERT OR REPLACE INTO cache_meta (key, value) VALUES ('schema_version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )?;

        Ok(())
    }
}
