use std::collections::BTreeMap;
use std::path::Path;

use crate::error::StorageError;

/// An ordered byte-keyed store.
///
/// Implementations are not required to be safe for concurrent writers:
/// mutation takes `&mut self` and `StorageAdapter` serialises access.
pub trait StorageEngine: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;
    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError>;
}

/// Durable engine backed by sled.
pub struct SledEngine {
    db: sled::Db,
}

impl SledEngine {
    /// Opens (creating if missing) the database in `path` with a cache of
    /// `cache_size` bytes.
    pub fn open(path: impl AsRef<Path>, cache_size: u64) -> Result<Self, StorageError> {
        let path = path.as_ref();

        tracing::info!(
            "Create database in {} with cache of {} bytes",
            path.display(),
            cache_size
        );

        let db = sled::Config::new()
            .path(path)
            .cache_capacity(cache_size)
            .open()
            .map_err(|e| StorageError::Open {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { db })
    }
}

impl StorageEngine for SledEngine {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.db.get(key)?.map(|value| value.to_vec()))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.db.insert(key, value)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.db.remove(key)?;
        Ok(())
    }
}

/// In-memory engine for tests and throwaway nodes. Nothing is persisted.
#[derive(Default)]
pub struct MemoryEngine {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl StorageEngine for MemoryEngine {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.data.remove(key);
        Ok(())
    }
}
