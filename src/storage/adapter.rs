use parking_lot::RwLock;

use super::engine::StorageEngine;
use crate::error::StorageError;

/// Synchronous get/put/delete over the local engine.
///
/// Reads share the lock; every write holds it exclusively.
pub struct StorageAdapter {
    engine: RwLock<Box<dyn StorageEngine>>,
}

impl StorageAdapter {
    pub fn new<E: StorageEngine + 'static>(engine: E) -> Self {
        Self {
            engine: RwLock::new(Box::new(engine)),
        }
    }

    /// A missing key yields an empty value, not an error.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>, StorageError> {
        let value = self.engine.read().get(key)?;
        Ok(value.unwrap_or_default())
    }

    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.engine.write().put(key, value)
    }

    pub fn delete(&self, key: &[u8]) -> Result<(), StorageError> {
        self.engine.write().delete(key)
    }
}
