//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod session;
mod transaction;
pub mod ledger;
pub mod result;
pub mod validation;

pub use account::{Account, AccountRef, ACCOUNT_NUMBER_MAX, ACCOUNT_NUMBER_MIN};
pub use ledger::Summary;
pub use session::Session;
pub use transaction::{Transaction, TransactionKind};
