//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "app": { "demoMode": false, "storage": "duckdb" }
//! }
//! ```
//! Fields this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Which key-value backend holds the bank data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    DuckDb,
    Json,
}

impl StorageBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "duckdb" => Some(Self::DuckDb),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuckDb => "duckdb",
            Self::Json => "json",
        }
    }

    /// Store file name for normal or demo data
    pub fn file_name(&self, demo_mode: bool) -> &'static str {
        match (self, demo_mode) {
            (Self::DuckDb, false) => "pinbank.duckdb",
            (Self::DuckDb, true) => "demo.duckdb",
            (Self::Json, false) => "pinbank.json",
            (Self::Json, true) => "demo.json",
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default)]
    storage: StorageBackend,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// PinBank configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
    pub storage: StorageBackend,
}

/// Parse a boolean-ish environment value
fn env_flag(name: &str) -> Option<bool> {
    match std::env::var(name).ok().as_deref() {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// Environment overrides (for CI/testing):
    /// - `PINBANK_DEMO_MODE`: true/false
    /// - `PINBANK_STORAGE`: duckdb/json
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = Self::read_settings(data_dir)?;

        let demo_mode = env_flag("PINBANK_DEMO_MODE").unwrap_or(raw.app.demo_mode);
        let storage = std::env::var("PINBANK_STORAGE")
            .ok()
            .and_then(|v| StorageBackend::parse(&v))
            .unwrap_or(raw.app.storage);

        Ok(Self { demo_mode, storage })
    }

    /// Save config to the data directory
    /// Preserves other settings this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = Self::read_settings(data_dir)?;

        settings.app.demo_mode = self.demo_mode;
        settings.app.storage = self.storage;

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }

    fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
        let settings_path = data_dir.join("settings.json");
        if !settings_path.exists() {
            return Ok(SettingsFile::default());
        }
        let content = std::fs::read_to_string(&settings_path)?;
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }

    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }

    /// File name of the store this configuration points at
    pub fn store_file_name(&self) -> &'static str {
        self.storage.file_name(self.demo_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.storage, StorageBackend::DuckDb);
        assert_eq!(config.store_file_name(), "pinbank.duckdb");
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "app": { "theme": "dark" }, "extra": [1, 2] }"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.storage = StorageBackend::Json;
        config.enable_demo_mode();
        config.save(dir.path()).unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("settings.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["app"]["theme"], "dark");
        assert_eq!(raw["app"]["storage"], "json");
        assert_eq!(raw["app"]["demoMode"], true);
        assert_eq!(raw["extra"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(StorageBackend::parse(" JSON "), Some(StorageBackend::Json));
        assert_eq!(StorageBackend::parse("sqlite"), None);
        assert_eq!(StorageBackend::Json.file_name(true), "demo.json");
    }
}
