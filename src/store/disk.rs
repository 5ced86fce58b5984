use crate::core::error::PersistenceError;
use crate::core::store::KeyValueStore;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "portfolio";

/// On-disk store backed by a fjall keyspace.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        std::fs::create_dir_all(path).map_err(|e| PersistenceError::Backend(e.to_string()))?;
        let keyspace = fjall::Config::new(path).open()?;
        let partition = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened disk store at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match self.partition.get(key)? {
            Some(bytes) => {
                debug!("Store HIT for key: {}", key);
                let value = String::from_utf8(bytes.to_vec())
                    .map_err(|e| PersistenceError::Backend(e.to_string()))?;
                Ok(Some(value))
            }
            None => {
                debug!("Store MISS for key: {}", key);
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.partition.insert(key, value)?;
        debug!("Store SET for key: {}", key);
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.partition.remove(key)?;
        debug!("Store REMOVE for key: {}", key);
        self.flush()
    }
}
