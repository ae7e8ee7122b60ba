//! Demo data provider
//!
//! Three customers with a short history each, loaded into an empty store
//! when demo mode is on.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Account, Transaction, TransactionKind};

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn history(entries: &[(TransactionKind, i64, &str)]) -> Vec<Transaction> {
    entries
        .iter()
        .map(|(kind, amount, date)| Transaction::new(*kind, Decimal::new(*amount, 0), at(date)))
        .collect()
}

/// Generate demo accounts
pub fn generate_demo_accounts() -> Vec<Account> {
    use TransactionKind::{Deposit, Loan, Withdrawal};

    vec![
        Account {
            full_name: "Jessica Davis".to_string(),
            user_name: "user1".to_string(),
            account_number: 123456,
            pin: 1111,
            interest_rate: Decimal::new(15, 1), // 1.5%
            transactions: history(&[
                (Deposit, 500, "2024-10-01T13:15:33.035Z"),
                (Withdrawal, 200, "2024-10-05T09:48:16.867Z"),
                (Deposit, 100, "2024-10-07T14:11:59.604Z"),
                (Loan, 800, "2024-10-15T17:01:17.194Z"),
                (Deposit, 300, "2024-10-18T23:36:17.929Z"),
            ]),
        },
        Account {
            full_name: "Michael Johnson".to_string(),
            user_name: "user2".to_string(),
            account_number: 234567,
            pin: 2222,
            interest_rate: Decimal::new(20, 1), // 2.0%
            transactions: history(&[
                (Deposit, 900, "2024-09-25T11:24:33.035Z"),
                (Withdrawal, 200, "2024-09-28T14:48:16.867Z"),
                (Deposit, 500, "2024-09-30T10:11:59.604Z"),
                (Loan, 600, "2024-10-19T09:01:17.194Z"),
                (Deposit, 400, "2024-10-20T12:36:17.929Z"),
            ]),
        },
        Account {
            full_name: "Emily Clark".to_string(),
            user_name: "user3".to_string(),
            account_number: 345678,
            pin: 3333,
            interest_rate: Decimal::new(18, 1), // 1.8%
            transactions: history(&[
                (Deposit, 1000, "2024-10-03T13:55:33.035Z"),
                (Withdrawal, 300, "2024-10-06T16:35:16.867Z"),
                (Deposit, 200, "2024-10-09T18:20:59.604Z"),
                (Loan, 1200, "2024-10-14T21:01:17.194Z"),
                (Deposit, 500, "2024-10-19T23:10:17.929Z"),
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger;
    use std::collections::HashSet;

    #[test]
    fn test_demo_accounts_are_unique() {
        let accounts = generate_demo_accounts();
        let names: HashSet<_> = accounts.iter().map(|a| a.user_name.as_str()).collect();
        let numbers: HashSet<_> = accounts.iter().map(|a| a.account_number).collect();
        assert_eq!(names.len(), 3);
        assert_eq!(numbers.len(), 3);
    }

    #[test]
    fn test_demo_balances() {
        let accounts = generate_demo_accounts();
        let balances: Vec<Decimal> = accounts.iter().map(|a| ledger::balance(a).unwrap()).collect();
        assert_eq!(
            balances,
            vec![Decimal::new(1500, 0), Decimal::new(2200, 0), Decimal::new(2600, 0)]
        );
    }
}
