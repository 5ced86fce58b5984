//! Durable key-value persistence abstraction.

use crate::core::error::PersistenceError;

/// String key to string value storage. Implementations must make a
/// successful `set`/`remove` durable before returning.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}
