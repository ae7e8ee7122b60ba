//! JSON file key-value store
//!
//! All keys live in one JSON object on disk. Every write takes an exclusive
//! lock on a sibling `.lock` file, re-reads the document, applies the change
//! and replaces the file through a temp file in the same directory, so a
//! crash never leaves a half-written document behind.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde_json::{Map, Value as JsonValue};
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::ports::{Change, KeyValueStore};

pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut lock_name = path.as_os_str().to_owned();
        lock_name.push(".lock");

        Ok(Self {
            path: path.to_path_buf(),
            lock_path: PathBuf::from(lock_name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_lock_file(&self) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;
        Ok(file)
    }

    fn read_document(&self) -> Result<Map<String, JsonValue>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)? {
            JsonValue::Object(map) => Ok(map),
            _ => Err(Error::storage(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_document(&self, document: &Map<String, JsonValue>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, document)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Run a read-modify-write cycle under the exclusive lock
    fn modify<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Map<String, JsonValue>),
    {
        let lock = self.open_lock_file()?;
        lock.lock_exclusive()?;

        let result = self.read_document().and_then(|mut document| {
            f(&mut document);
            self.write_document(&document)
        });

        // Unlock also happens on drop; doing it explicitly surfaces errors
        lock.unlock()?;
        result
    }
}

impl KeyValueStore for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let lock = self.open_lock_file()?;
        lock.lock_shared()?;
        let result = self.read_document().map(|mut doc| doc.remove(key));
        lock.unlock()?;
        result
    }

    fn set(&self, key: &str, value: &JsonValue) -> Result<()> {
        self.modify(|doc| {
            doc.insert(key.to_string(), value.clone());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.modify(|doc| {
            doc.remove(key);
        })
    }

    fn apply(&self, changes: &[Change]) -> Result<()> {
        self.modify(|doc| {
            for change in changes {
                match change {
                    Change::Set { key, value } => {
                        doc.insert(key.clone(), value.clone());
                    }
                    Change::Remove { key } => {
                        doc.remove(key);
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(&dir.path().join("bank.json")).unwrap();

        assert!(store.get("accounts").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("bank.json");

        {
            let store = JsonFileStore::new(&path).unwrap();
            store.set("session", &json!({ "userName": "user1" })).unwrap();
            store
                .apply(&[Change::set("a", json!(1)), Change::set("b", json!(2))])
                .unwrap();
        }

        let store = JsonFileStore::new(&path).unwrap();
        assert_eq!(store.get("session").unwrap(), Some(json!({ "userName": "user1" })));
        assert_eq!(store.get("b").unwrap(), Some(json!(2)));

        store.remove("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
    }

    #[test]
    fn test_rejects_non_object_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bank.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonFileStore::new(&path).unwrap();
        assert!(matches!(store.get("x"), Err(Error::Storage(_))));
    }
}
