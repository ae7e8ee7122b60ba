//! Ledger queries - balance and summary derived from an account's history
//!
//! Everything here is a pure function of an [`Account`]; nothing is cached
//! or written back, so the stored transaction list stays the single source
//! of truth.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::result::{Error, Result};
use super::transaction::{Transaction, TransactionKind};

/// Totals shown next to the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Deposits plus loans
    pub incomes: Decimal,
    /// Withdrawals
    pub outcomes: Decimal,
    /// Interest owed on loans at the account's rate
    pub interest: Decimal,
}

fn add(total: Decimal, amount: Decimal) -> Result<Decimal> {
    total.checked_add(amount).ok_or(Error::BalanceOverflow)
}

/// Signed sum of all transactions, folded from zero in insertion order
///
/// Fails with [`Error::BalanceOverflow`] when the running total leaves the
/// range of [`Decimal`].
pub fn balance(account: &Account) -> Result<Decimal> {
    account
        .transactions
        .iter()
        .try_fold(Decimal::ZERO, |total, tx| add(total, tx.signed_amount()))
}

pub fn summary(account: &Account) -> Result<Summary> {
    let mut summary = Summary::default();

    for tx in &account.transactions {
        match tx.kind {
            TransactionKind::Deposit => summary.incomes = add(summary.incomes, tx.amount)?,
            TransactionKind::Loan => {
                summary.incomes = add(summary.incomes, tx.amount)?;
                let interest = tx
                    .amount
                    .checked_mul(account.interest_rate)
                    .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                    .ok_or(Error::BalanceOverflow)?;
                summary.interest = add(summary.interest, interest)?;
            }
            TransactionKind::Withdrawal => summary.outcomes = add(summary.outcomes, tx.amount)?,
        }
    }

    Ok(summary)
}

/// Transactions ordered newest first, for display
///
/// The sort is stable, so entries sharing a timestamp keep their relative
/// insertion order.
pub fn history(account: &Account) -> Vec<&Transaction> {
    let mut txs: Vec<&Transaction> = account.transactions.iter().collect();
    txs.sort_by(|a, b| b.date.cmp(&a.date));
    txs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn jessica() -> Account {
        let mut account = Account::new("Jessica Davis", "user1", 1111, 123456, Decimal::new(15, 1));
        let entries = [
            (TransactionKind::Deposit, 500, "2024-10-01T13:15:33.035Z"),
            (TransactionKind::Withdrawal, 200, "2024-10-05T09:48:16.867Z"),
            (TransactionKind::Deposit, 100, "2024-10-07T14:11:59.604Z"),
            (TransactionKind::Loan, 800, "2024-10-15T17:01:17.194Z"),
            (TransactionKind::Deposit, 300, "2024-10-18T23:36:17.929Z"),
        ];
        for (kind, amount, date) in entries {
            account.push(Transaction::new(kind, Decimal::new(amount, 0), at(date)));
        }
        account
    }

    #[test]
    fn test_balance_scenario() {
        assert_eq!(balance(&jessica()).unwrap(), Decimal::new(1500, 0));
    }

    #[test]
    fn test_balance_empty_is_zero() {
        let account = Account::new("Nobody", "nobody", 1234, 111111, Decimal::ZERO);
        assert_eq!(balance(&account).unwrap(), Decimal::ZERO);
        assert_eq!(summary(&account).unwrap(), Summary::default());
    }

    #[test]
    fn test_balance_independent_of_order() {
        let account = jessica();
        let mut reversed = account.clone();
        reversed.transactions.reverse();
        assert_eq!(balance(&account).unwrap(), balance(&reversed).unwrap());
    }

    #[test]
    fn test_summary_scenario() {
        let summary = summary(&jessica()).unwrap();
        assert_eq!(summary.incomes, Decimal::new(1700, 0));
        assert_eq!(summary.outcomes, Decimal::new(200, 0));
        // 800 * 1.5 / 100
        assert_eq!(summary.interest, Decimal::new(12, 0));
    }

    #[test]
    fn test_summary_does_not_mutate() {
        let account = jessica();
        let before = account.clone();
        let _ = summary(&account);
        let _ = balance(&account);
        let _ = history(&account);
        assert_eq!(account, before);
    }

    #[test]
    fn test_history_newest_first() {
        let account = jessica();
        let txs = history(&account);
        assert_eq!(txs.len(), 5);
        assert_eq!(txs[0].amount, Decimal::new(300, 0));
        assert_eq!(txs[4].amount, Decimal::new(500, 0));
        // Stored order is untouched
        assert_eq!(account.transactions[0].amount, Decimal::new(500, 0));
    }

    #[test]
    fn test_balance_overflow_is_an_error() {
        let mut account = jessica();
        account.push(Transaction::new(
            TransactionKind::Deposit,
            Decimal::MAX,
            at("2024-10-19T08:00:00Z"),
        ));
        assert!(matches!(balance(&account), Err(Error::BalanceOverflow)));
        assert!(matches!(summary(&account), Err(Error::BalanceOverflow)));
    }

    #[test]
    fn test_interest_overflow_is_an_error() {
        let mut account = Account::new("Big Loan", "big", 1234, 111111, Decimal::new(15, 1));
        account.push(Transaction::new(
            TransactionKind::Loan,
            Decimal::MAX,
            at("2024-10-19T08:00:00Z"),
        ));
        // The balance itself fits, only the interest product does not
        assert_eq!(balance(&account).unwrap(), Decimal::MAX);
        assert!(matches!(summary(&account), Err(Error::BalanceOverflow)));
    }

    #[test]
    fn test_withdrawals_fold_below_zero() {
        let mut account = Account::new("Overdrawn", "over", 1234, 111111, Decimal::ZERO);
        account.push(Transaction::new(
            TransactionKind::Withdrawal,
            Decimal::MAX,
            at("2024-10-19T08:00:00Z"),
        ));
        assert_eq!(balance(&account).unwrap(), -Decimal::MAX);
        assert_eq!(summary(&account).unwrap().outcomes, Decimal::MAX);
    }
}
