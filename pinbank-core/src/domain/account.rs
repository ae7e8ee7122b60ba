//! Account domain model

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Smallest and largest six-digit account numbers
pub const ACCOUNT_NUMBER_MIN: u32 = 100_000;
pub const ACCOUNT_NUMBER_MAX: u32 = 999_999;

/// A customer's banking identity plus its transaction history
///
/// Serialized with the camelCase field names the stored documents use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub full_name: String,
    pub user_name: String,
    pub account_number: u32,
    /// Four-digit PIN, stored as an integer (0..=9999)
    pub pin: u16,
    /// Percentage applied to loans for interest reporting, in [0, 3)
    pub interest_rate: Decimal,
    /// Append-only
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// Create an account with no history
    pub fn new(
        full_name: impl Into<String>,
        user_name: impl Into<String>,
        pin: u16,
        account_number: u32,
        interest_rate: Decimal,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            user_name: user_name.into(),
            account_number,
            pin,
            interest_rate,
            transactions: Vec::new(),
        }
    }

    /// Random six-digit account number; uniqueness is checked by the caller
    pub fn generate_account_number<R: Rng + ?Sized>(rng: &mut R) -> u32 {
        rng.gen_range(ACCOUNT_NUMBER_MIN..=ACCOUNT_NUMBER_MAX)
    }

    /// Random interest rate in [0.00, 2.99] with two decimal places
    pub fn generate_interest_rate<R: Rng + ?Sized>(rng: &mut R) -> Decimal {
        Decimal::new(rng.gen_range(0..300), 2)
    }

    /// Exact credential match
    pub fn matches_credentials(&self, user_name: &str, pin: u16) -> bool {
        self.user_name == user_name && self.pin == pin
    }

    pub fn push(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }
}

/// Index entry kept under the `accounts` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub user_name: String,
    pub account_number: u32,
}

impl From<&Account> for AccountRef {
    fn from(account: &Account) -> Self {
        Self {
            user_name: account.user_name.clone(),
            account_number: account.account_number,
        }
    }
}
