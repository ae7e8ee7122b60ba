//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB table for the KeyValueStore port
//! - A locked JSON file for the KeyValueStore port
//! - An in-memory map for tests and embedding
//! - Demo data for first-run seeding

pub mod demo;
pub mod duckdb;
pub mod json_file;
pub mod memory;

use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::domain::result::Result;
use crate::ports::KeyValueStore;

/// Open the store the configuration selects inside `data_dir`
pub fn open_store(data_dir: &Path, config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let path = data_dir.join(config.store_file_name());
    let store: Arc<dyn KeyValueStore> = match config.storage {
        StorageBackend::DuckDb => Arc::new(duckdb::DuckDbStore::new(&path)?),
        StorageBackend::Json => Arc::new(json_file::JsonFileStore::new(&path)?),
    };
    Ok(store)
}
