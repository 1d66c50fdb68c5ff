//! Type-safe entity storage with generic key types.
//!
//! ## Architecture
//!
//! ```text
//! EntityStore<K, V>        ← Typed entity CRUD with generic keys (this file)
//!     ↓
//! StorageBackend           ← Generic K/V operations (storage_trait.rs)
//!     ↓
//! RocksDB                  ← Actual storage implementation
//! ```
//!
//! Keys are typed (`UserId`, composite message keys) so a key for one entity
//! cannot be used against another store by accident.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use krishi_commons::StorageKey;

use crate::storage_trait::{Partition, Result, StorageBackend, StorageError};

/// Trait for typed entity storage with automatic JSON serialization.
///
/// Implementors provide the backend handle and partition name; CRUD and scan
/// operations come for free.
pub trait EntityStore<K, V>
where
    K: StorageKey,
    V: Serialize + for<'de> Deserialize<'de> + Send + Sync,
{
    /// Returns a reference to the storage backend.
    fn backend(&self) -> &Arc<dyn StorageBackend>;

    /// Returns the partition name for this entity type.
    fn partition(&self) -> &str;

    /// Serializes an entity to bytes. Default is JSON.
    fn serialize(&self, entity: &V) -> Result<Vec<u8>> {
        serde_json::to_vec(entity).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    /// Deserializes bytes to an entity. Default is JSON.
    fn deserialize(&self, bytes: &[u8]) -> Result<V> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    /// Stores an entity by key. Overwrites an existing entry.
    fn put(&self, key: &K, entity: &V) -> Result<()> {
        let partition = Partition::new(self.partition());
        let bytes = self.serialize(entity)?;
        self.backend().put(&partition, &key.storage_key(), &bytes)
    }

    /// Retrieves an entity by key.
    fn get(&self, key: &K) -> Result<Option<V>> {
        let partition = Partition::new(self.partition());
        match self.backend().get(&partition, &key.storage_key())? {
            Some(bytes) => Ok(Some(self.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Removes an entity by key. Idempotent.
    fn delete(&self, key: &K) -> Result<()> {
        let partition = Partition::new(self.partition());
        self.backend().delete(&partition, &key.storage_key())
    }

    /// Scans entities whose keys start with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &[u8], limit: Option<usize>) -> Result<Vec<V>> {
        let partition = Partition::new(self.partition());
        self.backend()
            .scan(&partition, Some(prefix), limit)?
            .iter()
            .map(|(_, value)| self.deserialize(value))
            .collect()
    }

    /// Scans every entity in the partition, in key order.
    fn scan_all(&self) -> Result<Vec<V>> {
        let partition = Partition::new(self.partition());
        self.backend()
            .scan(&partition, None, None)?
            .iter()
            .map(|(_, value)| self.deserialize(value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rocksdb_impl::RocksDBBackend;
    use crate::test_utils::TestDb;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Crop {
        name: String,
        season: String,
    }

    struct CropStore {
        backend: Arc<dyn StorageBackend>,
    }

    impl EntityStore<String, Crop> for CropStore {
        fn backend(&self) -> &Arc<dyn StorageBackend> {
            &self.backend
        }

        fn partition(&self) -> &str {
            "users"
        }
    }

    #[test]
    fn typed_roundtrip() {
        let test_db = TestDb::new(&["users"]).unwrap();
        let store = CropStore {
            backend: Arc::new(RocksDBBackend::new(test_db.db.clone())),
        };

        let crop = Crop {
            name: "rice".into(),
            season: "monsoon".into(),
        };
        store.put(&"rice".to_string(), &crop).unwrap();
        assert_eq!(store.get(&"rice".to_string()).unwrap(), Some(crop));
        assert_eq!(store.get(&"wheat".to_string()).unwrap(), None);
    }
}
