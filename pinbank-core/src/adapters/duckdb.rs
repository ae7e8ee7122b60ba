//! DuckDB key-value store implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use duckdb::{params, Connection, OptionalExt};
use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::migrations::MIGRATIONS;
use crate::ports::{Change, KeyValueStore};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// Timestamp string for updated_at, computed in Rust (no ICU extension)
fn now_timestamp() -> String {
    Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Key-value store persisted in a DuckDB `sys_kv` table
pub struct DuckDbStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbStore {
    /// Open (or create) the database file and bring its schema up to date
    ///
    /// Includes retry logic with exponential backoff for file locking errors,
    /// which occur when another `pb` process holds the file.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    let store = Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    };
                    store.ensure_schema()?;
                    return Ok(store);
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[pinbank] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::storage(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        let store = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // IMPORTANT: Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS)
            .run_pending()
            .map_err(|e| Error::storage(format!("Migration failed: {}", e)))
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Number of keys stored
    pub fn count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM sys_kv", [], |row| row.get(0))?;
        Ok(count)
    }

    fn upsert(conn: &Connection, key: &str, value: &JsonValue, now: &str) -> Result<()> {
        let json = serde_json::to_string(value)?;
        conn.execute(
            "INSERT INTO sys_kv (kv_key, kv_value, updated_at)
             VALUES (?, ?, CAST(? AS TIMESTAMP))
             ON CONFLICT (kv_key) DO UPDATE SET
                kv_value = EXCLUDED.kv_value,
                updated_at = EXCLUDED.updated_at",
            params![key, json, now],
        )?;
        Ok(())
    }

    fn delete(conn: &Connection, key: &str) -> Result<()> {
        conn.execute("DELETE FROM sys_kv WHERE kv_key = ?", params![key])?;
        Ok(())
    }
}

impl KeyValueStore for DuckDbStore {
    fn name(&self) -> &str {
        "duckdb"
    }

    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let conn = self.lock()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT kv_value FROM sys_kv WHERE kv_key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &JsonValue) -> Result<()> {
        let conn = self.lock()?;
        Self::upsert(&conn, key, value, &now_timestamp())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        Self::delete(&conn, key)
    }

    /// All changes commit together or not at all
    fn apply(&self, changes: &[Change]) -> Result<()> {
        let mut conn = self.lock()?;
        let now = now_timestamp();
        let tx = conn.transaction()?;

        for change in changes {
            match change {
                Change::Set { key, value } => Self::upsert(&tx, key, value, &now)?,
                Change::Remove { key } => Self::delete(&tx, key)?,
            }
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_retryable_errors() {
        assert!(is_retryable_error("IO Error: Could not set lock on file"));
        assert!(is_retryable_error("database is locked"));
        assert!(!is_retryable_error("Catalog Error: Table does not exist"));
    }

    #[test]
    fn test_get_set_remove_in_memory() {
        let store = DuckDbStore::open_in_memory().unwrap();
        assert!(store.get("accounts").unwrap().is_none());

        store.set("accounts", &json!([{ "userName": "user1" }])).unwrap();
        store.set("accounts", &json!([{ "userName": "user2" }])).unwrap();
        assert_eq!(
            store.get("accounts").unwrap(),
            Some(json!([{ "userName": "user2" }]))
        );
        assert_eq!(store.count().unwrap(), 1);

        store.remove("accounts").unwrap();
        assert!(store.get("accounts").unwrap().is_none());
    }

    #[test]
    fn test_apply_commits_batch() {
        let store = DuckDbStore::open_in_memory().unwrap();
        store.set("session", &json!({ "token": "t" })).unwrap();

        store
            .apply(&[
                Change::set("account:a", json!({ "n": 1 })),
                Change::set("account:b", json!({ "n": 2 })),
                Change::remove("session"),
            ])
            .unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert!(store.get("session").unwrap().is_none());
    }

    #[test]
    fn test_reopen_file_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("bank.duckdb");

        {
            let store = DuckDbStore::new(&db_path).unwrap();
            store.set("k", &json!("v")).unwrap();
        }

        let store = DuckDbStore::new(&db_path).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!("v")));
        assert_eq!(store.db_path(), Some(db_path.as_path()));
    }
}
