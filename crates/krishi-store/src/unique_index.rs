//! Unique secondary index: index key → primary key.
//!
//! Used for the user store's email and external-provider-id uniqueness
//! invariants. Storage format is `index_key` → `primary_key` in a dedicated
//! partition.

use std::sync::Arc;

use crate::storage_trait::{Partition, Result, StorageBackend, StorageError};

/// One-to-one mapping from an index key to a primary key.
#[derive(Clone)]
pub struct UniqueIndex {
    backend: Arc<dyn StorageBackend>,
    partition: Partition,
}

impl UniqueIndex {
    pub fn new(backend: Arc<dyn StorageBackend>, partition_name: &str) -> Self {
        Self {
            backend,
            partition: Partition::new(partition_name),
        }
    }

    /// Looks up the primary key for an index key.
    pub fn get(&self, index_key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.backend.get(&self.partition, index_key)
    }

    /// Inserts an index entry, failing if the key is already mapped to a
    /// different primary key.
    pub fn insert(&self, index_key: &[u8], primary_key: &[u8]) -> Result<()> {
        if let Some(existing) = self.backend.get(&self.partition, index_key)? {
            if existing != primary_key {
                return Err(StorageError::UniqueConstraintViolation(format!(
                    "index {} already maps {:?}",
                    self.partition,
                    String::from_utf8_lossy(index_key)
                )));
            }
            return Ok(());
        }
        self.backend.put(&self.partition, index_key, primary_key)
    }

    /// Removes an index entry. Idempotent.
    pub fn remove(&self, index_key: &[u8]) -> Result<()> {
        self.backend.delete(&self.partition, index_key)
    }
}
