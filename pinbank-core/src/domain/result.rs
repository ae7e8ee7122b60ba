//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
///
/// The first seven variants are the expected, user-facing outcomes of bank
/// operations. Their `Display` text is shown to the user verbatim.
#[derive(Error, Debug)]
pub enum Error {
    #[error("User already registered")]
    DuplicateUser,

    #[error("Invalid user name or pin")]
    InvalidCredentials,

    #[error("User is not authenticated")]
    NotAuthenticated,

    #[error("Recipient account {0} not found")]
    RecipientNotFound(u32),

    #[error("Cannot transfer money to your own account")]
    SelfTransfer,

    #[error("You do not have enough balance to transfer")]
    InsufficientBalance,

    #[error("The amount would exceed the largest supported balance")]
    BalanceOverflow,

    #[error("{0}")]
    Validation(String),

    #[error("Could not allocate a unique account number")]
    AccountNumbersExhausted,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// True for the expected outcomes a user can fix by changing their input
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUser
                | Self::InvalidCredentials
                | Self::NotAuthenticated
                | Self::RecipientNotFound(_)
                | Self::SelfTransfer
                | Self::InsufficientBalance
                | Self::BalanceOverflow
                | Self::Validation(_)
        )
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for FFI serialization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Attach a context entry
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                let user_facing = e.is_user_facing();
                Self::fail(e.to_string()).with_context("userFacing", user_facing.into())
            }
        }
    }
}
