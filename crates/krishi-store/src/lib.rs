//! # krishi-store
//!
//! Low-level key-value store abstraction for the Krishi Sahayogi backend.
//! This crate isolates all direct RocksDB interactions, allowing krishi-core
//! to remain free of RocksDB dependencies.
//!
//! ## Architecture
//!
//! ```text
//! krishi-core (business logic)
//!     ↓
//! krishi-store (K/V operations)
//!     ↓
//! RocksDB (storage engine)
//! ```

pub mod entity_store;
pub mod rocksdb_impl;
pub mod rocksdb_init;
pub mod storage_trait;
pub mod test_utils;
pub mod unique_index;

pub use entity_store::EntityStore;
pub use rocksdb_impl::RocksDBBackend;
pub use rocksdb_init::RocksDbInit;
pub use storage_trait::{Operation, Partition, StorageBackend, StorageError};
pub use unique_index::UniqueIndex;

// Re-export StorageKey from krishi-commons to avoid import inconsistency
pub use krishi_commons::StorageKey;
