//! Session domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Account;

/// An authenticated interaction with one account
///
/// Handed explicitly to every operation that needs a logged-in user. The
/// store keeps a copy under the `session` key; a session is active only
/// while its token matches that copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Uuid,
    pub user_name: String,
    pub account_number: u32,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Open a fresh session for an account
    pub fn open(account: &Account) -> Self {
        Self {
            token: Uuid::new_v4(),
            user_name: account.user_name.clone(),
            account_number: account.account_number,
            started_at: Utc::now(),
        }
    }

    /// Whether this session was issued for the given account
    pub fn belongs_to(&self, account: &Account) -> bool {
        self.user_name == account.user_name && self.account_number == account.account_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_open_issues_distinct_tokens() {
        let account = Account::new("Emily Clark", "user3", 3333, 345678, Decimal::new(18, 1));
        let a = Session::open(&account);
        let b = Session::open(&account);

        assert_ne!(a.token, b.token);
        assert!(a.belongs_to(&account));
        assert_eq!(a.account_number, 345678);
    }
}
