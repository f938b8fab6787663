//! In-memory key-value store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use codementor_protocols::{KvStore, StoreArea, StoreError};

/// A [`KvStore`] held in process memory.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    areas: RwLock<HashMap<StoreArea, HashMap<String, Value>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every key of the session area.
    pub fn end_session(&self) {
        self.areas.write().remove(&StoreArea::Session);
    }

    /// Number of keys held in `area`.
    pub fn len(&self, area: StoreArea) -> usize {
        self.areas.read().get(&area).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.areas.read().values().all(HashMap::is_empty)
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    fn id(&self) -> &str {
        "memory"
    }

    async fn get(&self, area: StoreArea, keys: &[&str]) -> Result<Map<String, Value>, StoreError> {
        let areas = self.areas.read();
        let mut found = Map::new();
        if let Some(entries) = areas.get(&area) {
            for key in keys {
                if let Some(value) = entries.get(*key) {
                    found.insert((*key).to_string(), value.clone());
                }
            }
        }
        Ok(found)
    }

    async fn set(&self, area: StoreArea, items: Map<String, Value>) -> Result<(), StoreError> {
        let mut areas = self.areas.write();
        areas.entry(area).or_default().extend(items);
        Ok(())
    }

    async fn remove(&self, area: StoreArea, keys: &[String]) -> Result<(), StoreError> {
        if let Some(entries) = self.areas.write().get_mut(&area) {
            for key in keys {
                entries.remove(key);
            }
        }
        Ok(())
    }

    async fn keys(&self, area: StoreArea) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self
            .areas
            .read()
            .get(&area)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}
