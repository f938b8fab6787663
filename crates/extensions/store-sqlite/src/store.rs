//! SQLite key-value store implementation.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::params;
use serde_json::{Map, Value};
use tokio_rusqlite::Connection;
use tracing::debug;

use codementor_protocols::{KvStore, StoreArea, StoreError};

use crate::schema::init_schema;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// SQLite-based key-value store.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Open a file-backed database, creating parent directories.
    ///
    /// Whatever was left in the `session` area by an earlier run is dropped.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        }

        let conn = Connection::open(&path)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        let cleared = conn
            .call(|conn| {
                init_schema(conn)?;
                let cleared = conn.execute(
                    "DELETE FROM kv WHERE area = ?1",
                    params![StoreArea::Session.as_str()],
                )?;
                Ok(cleared)
            })
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))?;

        debug!(path = %path.display(), cleared, "Opened SQLite store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    fn id(&self) -> &str {
        "sqlite"
    }

    async fn get(&self, area: StoreArea, keys: &[&str]) -> Result<Map<String, Value>, StoreError> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM kv WHERE area = ?1 AND key = ?2")?;
                let mut rows = Vec::new();
                for key in keys {
                    let mut found = stmt.query(params![area.as_str(), key])?;
                    if let Some(row) = found.next()? {
                        let value: String = row.get(0)?;
                        rows.push((key, value));
                    }
                }
                Ok(rows)
            })
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))?;

        let mut items = Map::new();
        for (key, value) in rows {
            items.insert(key, serde_json::from_str(&value)?);
        }
        Ok(items)
    }

    async fn set(&self, area: StoreArea, items: Map<String, Value>) -> Result<(), StoreError> {
        let rows: Vec<(String, String)> = items
            .into_iter()
            .map(|(key, value)| Ok((key, serde_json::to_string(&value)?)))
            .collect::<Result<_, serde_json::Error>>()?;

        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for (key, value) in rows {
                    tx.execute(
                        "INSERT INTO kv (area, key, value) VALUES (?1, ?2, ?3)
                         ON CONFLICT(area, key) DO UPDATE SET value = excluded.value",
                        params![area.as_str(), key, value],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))
    }

    async fn remove(&self, area: StoreArea, keys: &[String]) -> Result<(), StoreError> {
        let keys = keys.to_vec();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for key in keys {
                    tx.execute(
                        "DELETE FROM kv WHERE area = ?1 AND key = ?2",
                        params![area.as_str(), key],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))
    }

    async fn keys(&self, area: StoreArea) -> Result<Vec<String>, StoreError> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT key FROM kv WHERE area = ?1 ORDER BY key")?;
                let keys = stmt
                    .query_map(params![area.as_str()], |row| row.get(0))?
                    .filter_map(|r| r.ok())
                    .collect::<Vec<String>>();
                Ok(keys)
            })
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))
    }
}
