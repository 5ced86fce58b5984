pub mod disk;
pub mod memory;

use crate::core::error::PersistenceError;
use crate::core::store::KeyValueStore;
use disk::DiskStore;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Opens the on-disk store under `data_path`. Failure is returned, never
/// replaced by an in-memory store.
pub fn open_store(data_path: &Path) -> Result<Arc<dyn KeyValueStore>, PersistenceError> {
    match DiskStore::open(&data_path.join("store")) {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) => {
            warn!("Failed to open store at {}: {}", data_path.display(), e);
            Err(e)
        }
    }
}
