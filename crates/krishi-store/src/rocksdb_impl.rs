//! RocksDB implementation of the StorageBackend trait.
//!
//! Maps partitions to RocksDB column families. The full set of column
//! families is known statically (`krishi_commons::constants::Partitions`) and
//! created at open time by [`crate::RocksDbInit`], so `create_partition`
//! never mutates the live handle.

use rocksdb::{ColumnFamily, Direction, IteratorMode, WriteBatch, DB};
use std::sync::Arc;

use crate::storage_trait::{Operation, Partition, Result, StorageBackend, StorageError};

/// RocksDB implementation of the StorageBackend trait.
pub struct RocksDBBackend {
    db: Arc<DB>,
}

impl RocksDBBackend {
    /// Creates a new RocksDB backend with the given database handle.
    pub fn new(db: Arc<DB>) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn db(&self) -> &Arc<DB> {
        &self.db
    }

    fn get_cf(&self, partition: &Partition) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))
    }
}

impl StorageBackend for RocksDBBackend {
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self.get_cf(partition)?;
        self.db
            .get_cf(cf, key)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.get_cf(partition)?;
        self.db
            .put_cf(cf, key, value)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()> {
        let cf = self.get_cf(partition)?;
        self.db
            .delete_cf(cf, key)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn batch(&self, operations: Vec<Operation>) -> Result<()> {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                Operation::Put {
                    partition,
                    key,
                    value,
                } => {
                    let cf = self.get_cf(&partition)?;
                    batch.put_cf(cf, key, value);
                }
                Operation::Delete { partition, key } => {
                    let cf = self.get_cf(&partition)?;
                    batch.delete_cf(cf, key);
                }
            }
        }
        self.db
            .write(batch)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let cf = self.get_cf(partition)?;
        let mode = match prefix {
            Some(p) => IteratorMode::From(p, Direction::Forward),
            None => IteratorMode::Start,
        };

        let mut entries = Vec::new();
        for item in self.db.iterator_cf(cf, mode) {
            let (key, value) = item.map_err(|e| StorageError::IoError(e.to_string()))?;
            if let Some(p) = prefix {
                // Iteration is ordered, so the first non-matching key ends the scan
                if !key.starts_with(p) {
                    break;
                }
            }
            entries.push((key.to_vec(), value.to_vec()));
            if let Some(max) = limit {
                if entries.len() >= max {
                    break;
                }
            }
        }
        Ok(entries)
    }

    fn partition_exists(&self, partition: &Partition) -> bool {
        self.db.cf_handle(partition.name()).is_some()
    }

    fn create_partition(&self, partition: &Partition) -> Result<()> {
        // Column families are fixed at open time (RocksDbInit)
        if self.partition_exists(partition) {
            Ok(())
        } else {
            Err(StorageError::PartitionNotFound(
                partition.name().to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestDb;

    fn backend() -> (TestDb, RocksDBBackend) {
        let test_db = TestDb::new(&["users", "messages"]).unwrap();
        let backend = RocksDBBackend::new(test_db.db.clone());
        (test_db, backend)
    }

    #[test]
    fn put_get_delete_roundtrip() {
        let (_guard, backend) = backend();
        let partition = Partition::new("users");

        backend.put(&partition, b"k1", b"v1").unwrap();
        assert_eq!(backend.get(&partition, b"k1").unwrap(), Some(b"v1".to_vec()));

        backend.delete(&partition, b"k1").unwrap();
        assert_eq!(backend.get(&partition, b"k1").unwrap(), None);
    }

    #[test]
    fn unknown_partition_is_an_error() {
        let (_guard, backend) = backend();
        let partition = Partition::new("missing");
        assert!(matches!(
            backend.get(&partition, b"k"),
            Err(StorageError::PartitionNotFound(_))
        ));
    }

    #[test]
    fn scan_respects_prefix_and_order() {
        let (_guard, backend) = backend();
        let partition = Partition::new("messages");

        backend.put(&partition, b"a:b:001", b"1").unwrap();
        backend.put(&partition, b"a:b:002", b"2").unwrap();
        backend.put(&partition, b"a:c:001", b"3").unwrap();

        let entries = backend.scan(&partition, Some(b"a:b:"), None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, b"a:b:001".to_vec());
        assert_eq!(entries[1].0, b"a:b:002".to_vec());
    }

    #[test]
    fn batch_applies_all_operations() {
        let (_guard, backend) = backend();
        let partition = Partition::new("users");

        backend.put(&partition, b"old", b"x").unwrap();
        backend
            .batch(vec![
                Operation::Put {
                    partition: partition.clone(),
                    key: b"new".to_vec(),
                    value: b"y".to_vec(),
                },
                Operation::Delete {
                    partition: partition.clone(),
                    key: b"old".to_vec(),
                },
            ])
            .unwrap();

        assert_eq!(backend.get(&partition, b"new").unwrap(), Some(b"y".to_vec()));
        assert_eq!(backend.get(&partition, b"old").unwrap(), None);
    }
}
