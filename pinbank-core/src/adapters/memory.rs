//! In-memory key-value store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::ports::{Change, KeyValueStore};

/// Store backed by a `HashMap`; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, JsonValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every entry, for comparing before/after states in tests
    pub fn snapshot(&self) -> Result<HashMap<String, JsonValue>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, JsonValue>>> {
        self.entries
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &JsonValue) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn apply(&self, changes: &[Change]) -> Result<()> {
        let mut entries = self.lock()?;
        for change in changes {
            match change {
                Change::Set { key, value } => {
                    entries.insert(key.clone(), value.clone());
                }
                Change::Remove { key } => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}
