use crate::core::error::PersistenceError;
use crate::core::store::KeyValueStore;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates a new empty MemoryStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let value = map.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {}", key);
        } else {
            debug!("Store MISS for key: {}", key);
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        debug!("Store SET for key: {}", key);
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.remove(key);
        debug!("Store REMOVE for key: {}", key);
        Ok(())
    }
}
