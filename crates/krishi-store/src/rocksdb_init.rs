//! RocksDB open helper.
//!
//! Opens the database with every known partition as a column family so the
//! backend never needs to mutate the column family set at runtime.

use anyhow::{Context, Result};
use rocksdb::{Options, DB};
use std::path::Path;
use std::sync::Arc;

use krishi_commons::constants::Partitions;

/// Opens the RocksDB database used by the backend.
pub struct RocksDbInit {
    path: String,
}

impl RocksDbInit {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Opens (or creates) the database with all known column families.
    pub fn open(&self) -> Result<Arc<DB>> {
        std::fs::create_dir_all(Path::new(&self.path))
            .with_context(|| format!("creating storage directory {}", self.path))?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, &self.path, Partitions::ALL)
            .with_context(|| format!("opening RocksDB at {}", self.path))?;
        Ok(Arc::new(db))
    }
}
