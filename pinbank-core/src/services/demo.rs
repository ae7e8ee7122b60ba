//! Demo service - manage demo mode
//!
//! Demo mode points the bank at a separate store file pre-loaded with
//! sample customers, so the real data is never touched.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::adapters::demo::generate_demo_accounts;
use crate::adapters::open_store;
use crate::config::Config;

use super::BankService;

/// Demo service for managing demo mode
pub struct DemoService {
    data_dir: PathBuf,
}

impl DemoService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Check if demo mode is currently enabled
    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.data_dir)?;
        Ok(config.demo_mode)
    }

    /// Enable demo mode
    ///
    /// This will:
    /// 1. Delete any existing demo store (fresh start)
    /// 2. Enable demo mode in config
    /// 3. Create the demo store and load the sample customers
    pub fn enable(&self) -> Result<usize> {
        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.enable_demo_mode();
        self.remove_demo_files(&config)?;
        config.save(&self.data_dir)?;

        let bank = BankService::new(open_store(&self.data_dir, &config)?);
        Ok(Self::seed(&bank)?)
    }

    /// Disable demo mode
    ///
    /// Optionally deletes the demo store (if clean = true)
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.data_dir)?;

        if clean {
            let mut demo = config.clone();
            demo.enable_demo_mode();
            self.remove_demo_files(&demo)?;
        }

        Ok(())
    }

    /// Load the sample customers into an empty bank
    ///
    /// Does nothing once any account exists.
    pub fn seed(bank: &BankService) -> crate::Result<usize> {
        if bank.account_count()? > 0 {
            return Ok(0);
        }
        bank.seed(&generate_demo_accounts())
    }

    fn remove_demo_files(&self, demo_config: &Config) -> Result<()> {
        let store_file = self.data_dir.join(demo_config.store_file_name());
        let mut companions = Vec::new();
        for suffix in [".wal", ".lock"] {
            let mut name = store_file.as_os_str().to_owned();
            name.push(suffix);
            companions.push(PathBuf::from(name));
        }

        for path in std::iter::once(store_file).chain(companions) {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_seed_only_into_empty_bank() {
        let bank = BankService::new(Arc::new(MemoryStore::new()));
        assert_eq!(DemoService::seed(&bank).unwrap(), 3);
        assert_eq!(DemoService::seed(&bank).unwrap(), 0);

        let empty_again = BankService::new(Arc::new(MemoryStore::new()));
        empty_again.register("Ada Lovelace", "ada", 1234).unwrap();
        assert_eq!(DemoService::seed(&empty_again).unwrap(), 0);
    }
}
