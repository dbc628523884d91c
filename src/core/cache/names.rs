//! Reference name table: subset lookup and upsert

use std::collections::HashMap;

use rusqlite::{params, params_from_iter};

use super::{CacheError, ReferenceCache, ReferenceStore};
use crate::entities::Character;

/// Keys per `IN (...)` lookup, below SQLite's bound-parameter limit
const LOOKUP_CHUNK: usize = 500;

impl ReferenceCache {
    /// Names for the requested URLs that are cached
    pub fn load_names(&self, urls: &[String]) -> Result<HashMap<String, String>, CacheError> {
        let mut names = HashMap::new();

        for chunk in urls.chunks(LOOKUP_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT url, name FROM reference_names WHERE url IN ({})",
                placeholders
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (url, name) = row?;
                names.insert(url, name);
            }
        }

        Ok(names)
    }

    /// Every cached name (for `swx cache` inspection)
    pub fn all_names(&self) -> Result<Vec<(String, String)>, CacheError> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, name FROM reference_names ORDER BY url")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Upsert resolved names in one transaction
    pub fn store_names(&mut self, names: &[(String, String)]) -> Result<(), CacheError> {
        if names.is_empty() {
            return Ok(());
        }
        let tx = self.conn.transaction()?;
        {
            let mut upsert = tx.prepare(
                "INSERT INTO reference_names (url, name) VALUES (?1, ?2)
                 ON CONFLICT(url) DO UPDATE SET name = excluded.name",
            )?;
            for (url, name) in names {
                upsert.execute(params![url, name])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl ReferenceStore for ReferenceCache {
    fn load_all_entities(&self) -> Result<Vec<Character>, CacheError> {
        ReferenceCache::load_all_entities(self)
    }

    fn replace_all_entities(&mut self, records: &[Character]) -> Result<(), CacheError> {
        ReferenceCache::replace_all_entities(self, records)
    }

    fn load_names(&self, urls: &[String]) -> Result<HashMap<String, String>, CacheError> {
        ReferenceCache::load_names(self, urls)
    }

    fn store_names(&mut self, names: &[(String, String)]) -> Result<(), CacheError> {
        ReferenceCache::store_names(self, names)
    }
}
