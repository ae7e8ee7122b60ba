//! PinBank Core - Business logic for a small PIN-protected bank
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Account, Transaction, Session) and the ledger
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Business logic orchestration (BankService, DemoService, logging)
//! - **adapters**: Concrete implementations (DuckDB, JSON file, in-memory)
//! - **handlers**: Form-level callbacks for presentation layers

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod handlers;
pub mod migrations;
pub mod log_migrations;

use std::path::Path;
use std::sync::Arc;

use config::Config;
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::{Account, Session, Summary, Transaction, TransactionKind};
pub use domain::result::{Error, OperationResult, Result};
pub use handlers::FormHandlers;
pub use services::{BankService, Statement};

/// Main context for PinBank operations
///
/// This is the primary entry point for all business logic. It holds
/// the configured store, configuration, and all services.
pub struct BankContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub bank_service: Arc<BankService>,
    pub handlers: FormHandlers,
}

impl BankContext {
    /// Create a new PinBank context
    ///
    /// In demo mode an empty store is loaded with the sample customers.
    /// Outside demo mode the store starts empty and is never seeded, so
    /// the sample customers cannot mix with real accounts.
    pub fn new(data_dir: &Path) -> anyhow::Result<Self> {
        let config = Config::load(data_dir)?;
        let store = adapters::open_store(data_dir, &config)?;

        let bank_service = Arc::new(BankService::new(Arc::clone(&store)));
        if config.demo_mode {
            DemoService::seed(&bank_service)?;
        }
        let handlers = FormHandlers::new(Arc::clone(&bank_service));

        Ok(Self {
            config,
            store,
            bank_service,
            handlers,
        })
    }
}
