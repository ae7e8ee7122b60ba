//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod bank;
mod demo;
pub mod logging;
pub mod migration;

pub use bank::{account_key, BankService, Statement, ACCOUNTS_KEY, SESSION_KEY};
pub use demo::DemoService;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
