//! Key-value store port - storage abstraction

use serde_json::Value as JsonValue;

use crate::domain::result::Result;

/// One write in a batch
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Set { key: String, value: JsonValue },
    Remove { key: String },
}

impl Change {
    pub fn set(key: impl Into<String>, value: JsonValue) -> Self {
        Self::Set { key: key.into(), value }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }
}

/// Persistent mapping from string keys to JSON documents
///
/// Implementations (adapters) provide the actual storage. Reads of a
/// missing key return `None`; removing a missing key is not an error.
pub trait KeyValueStore: Send + Sync {
    /// Short backend name for diagnostics ("memory", "duckdb", "json")
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Result<Option<JsonValue>>;

    fn set(&self, key: &str, value: &JsonValue) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Apply several writes as one unit
    ///
    /// The default applies them in order; backends that can do better
    /// (a database transaction, a single file rewrite) override it.
    fn apply(&self, changes: &[Change]) -> Result<()> {
        for change in changes {
            match change {
                Change::Set { key, value } => self.set(key, value)?,
                Change::Remove { key } => self.remove(key)?,
            }
        }
        Ok(())
    }
}
