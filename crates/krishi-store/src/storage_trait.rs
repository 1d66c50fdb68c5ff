//! Generic storage backend trait and supporting types.
//!
//! The trait is synchronous; async callers cross the boundary with
//! `tokio::task::spawn_blocking` so RocksDB I/O never blocks the event loop.

use std::fmt;

/// A named partition of the key space (maps to a RocksDB column family).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition(String);

impl Partition {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage layer error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Partition (column family) not found
    PartitionNotFound(String),

    /// Generic I/O error from underlying storage
    IoError(String),

    /// Serialization/deserialization error
    SerializationError(String),

    /// Unique constraint violation (for indexes)
    UniqueConstraintViolation(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::PartitionNotFound(p) => write!(f, "Partition not found: {}", p),
            StorageError::IoError(msg) => write!(f, "I/O error: {}", msg),
            StorageError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            StorageError::UniqueConstraintViolation(msg) => {
                write!(f, "Unique constraint violation: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A single mutation, for atomic batches.
#[derive(Debug, Clone)]
pub enum Operation {
    Put {
        partition: Partition,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Delete {
        partition: Partition,
        key: Vec<u8>,
    },
}

/// Generic key-value operations over named partitions.
///
/// Implementations must be thread-safe; handles are shared across the actix
/// worker pool behind an `Arc`.
pub trait StorageBackend: Send + Sync {
    /// Retrieves a value by key. Returns `Ok(None)` if the key doesn't exist.
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Stores a key-value pair. An existing key is overwritten.
    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()>;

    /// Deletes a key. Idempotent: deleting a missing key is `Ok(())`.
    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()>;

    /// Executes multiple operations atomically. Either all operations
    /// succeed or none are applied.
    fn batch(&self, operations: Vec<Operation>) -> Result<()>;

    /// Scans key-value pairs in key order, optionally restricted to a key
    /// prefix and capped at `limit` entries.
    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Checks if a partition exists.
    fn partition_exists(&self, partition: &Partition) -> bool;

    /// Creates a partition if missing.
    fn create_partition(&self, partition: &Partition) -> Result<()>;
}
