//! Character table: load-all and replace-all

use rusqlite::params;
use tracing::warn;

use super::{CacheError, ReferenceCache};
use crate::entities::Character;

impl ReferenceCache {
    /// Every cached character, in stored order
    ///
    /// Rows that no longer decode are skipped; the next refresh rewrites them.
    pub fn load_all_entities(&self) -> Result<Vec<Character>, CacheError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, record FROM characters ORDER BY position")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut characters = Vec::new();
        for row in rows {
            let (name, record) = row?;
            match serde_json::from_str::<Character>(&record) {
                Ok(character) => characters.push(character),
                Err(e) => warn!(%name, error = %e, "skipping undecodable cached character"),
            }
        }

        Ok(characters)
    }

    /// Replace the cached character set in a single transaction
    ///
    /// Names repeated within `records` keep their last occurrence.
    pub fn replace_all_entities(&mut self, records: &[Character]) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM characters", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO characters (name, position, record) VALUES (?1, ?2, ?3)",
            )?;
            for (position, character) in records.iter().enumerate() {
                let record = serde_json::to_string(character)?;
                insert.execute(params![character.name, position as i64, record])?;
            }
        }
        Self::touch_last_refresh(&tx)?;
        tx.commit()?;
        Ok(())
    }
}
