//! Bank service - registration, sessions, transfers and loans
//!
//! Storage layout (one JSON document per key):
//!
//! - `accounts`: index of `{userName, accountNumber}` for every account
//! - `account:<userName>`: the full account, transactions included
//! - `session`: the session that is currently active
//!
//! Every mutating operation loads what it needs, builds the new documents
//! in memory and hands them to the store as one [`Change`] batch, so a
//! failed check never leaves a partial write behind.

use std::sync::{Arc, Mutex, MutexGuard};

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ledger::{self, Summary};
use crate::domain::result::{Error, Result};
use crate::domain::validation;
use crate::domain::{Account, AccountRef, Session, Transaction, TransactionKind};
use crate::ports::{Change, KeyValueStore};

pub const ACCOUNTS_KEY: &str = "accounts";
pub const SESSION_KEY: &str = "session";

/// Attempts at drawing an unused account number before giving up
const MAX_ACCOUNT_NUMBER_ATTEMPTS: u32 = 64;

pub fn account_key(user_name: &str) -> String {
    format!("account:{}", user_name)
}

/// Everything the dashboard shows for the logged-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub full_name: String,
    pub user_name: String,
    pub account_number: u32,
    pub interest_rate: Decimal,
    pub balance: Decimal,
    pub summary: Summary,
    /// Newest first
    pub transactions: Vec<Transaction>,
}

impl Statement {
    fn from_account(account: &Account) -> Result<Self> {
        Ok(Self {
            full_name: account.full_name.clone(),
            user_name: account.user_name.clone(),
            account_number: account.account_number,
            interest_rate: account.interest_rate,
            balance: ledger::balance(account)?,
            summary: ledger::summary(account)?,
            transactions: ledger::history(account).into_iter().cloned().collect(),
        })
    }
}

/// Account manager over a key-value store
pub struct BankService {
    store: Arc<dyn KeyValueStore>,
    /// Serialises read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl BankService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    // === Accounts ===

    /// Create an account and open a session for it
    pub fn register(&self, full_name: &str, user_name: &str, pin: u16) -> Result<(Account, Session)> {
        validation::validate_full_name(full_name)?;
        validation::validate_user_name(user_name)?;
        validation::validate_pin(pin)?;

        let _guard = self.guard()?;
        let mut index = self.load_index()?;

        if index.iter().any(|r| r.user_name == user_name)
            || self.load_account(user_name)?.is_some()
        {
            return Err(Error::DuplicateUser);
        }

        let mut rng = rand::thread_rng();
        let account_number = Self::allocate_account_number(&index, &mut rng)?;
        let account = Account::new(
            full_name,
            user_name,
            pin,
            account_number,
            Account::generate_interest_rate(&mut rng),
        );
        let session = Session::open(&account);

        index.push(AccountRef::from(&account));
        self.store.apply(&[
            Self::account_change(&account)?,
            Self::index_change(&index)?,
            Change::set(SESSION_KEY, serde_json::to_value(&session)?),
        ])?;

        Ok((account, session))
    }

    /// Open a session for the account matching both credentials exactly
    pub fn login(&self, user_name: &str, pin: u16) -> Result<Session> {
        let _guard = self.guard()?;

        let account = self
            .load_account(user_name)?
            .filter(|a| a.matches_credentials(user_name, pin))
            .ok_or(Error::InvalidCredentials)?;

        let session = Session::open(&account);
        self.store.set(SESSION_KEY, &serde_json::to_value(&session)?)?;
        Ok(session)
    }

    pub fn logout(&self, session: &Session) -> Result<()> {
        let _guard = self.guard()?;
        self.authenticate(session)?;
        self.store.remove(SESSION_KEY)
    }

    /// Remove the session's account after re-checking its credentials
    ///
    /// The session ends with the account.
    pub fn delete_account(&self, session: &Session, user_name: &str, pin: u16) -> Result<()> {
        let _guard = self.guard()?;
        let account = self.authenticate(session)?;

        if !account.matches_credentials(user_name, pin) {
            return Err(Error::InvalidCredentials);
        }

        let index: Vec<AccountRef> = self
            .load_index()?
            .into_iter()
            .filter(|r| r.user_name != account.user_name)
            .collect();

        self.store.apply(&[
            Self::index_change(&index)?,
            Change::remove(account_key(&account.user_name)),
            Change::remove(SESSION_KEY),
        ])
    }

    // === Money movement ===

    /// Move `amount` from the session's account to another account
    pub fn transfer(&self, session: &Session, to_account_number: u32, amount: Decimal) -> Result<()> {
        validation::validate_amount(amount)?;

        let _guard = self.guard()?;
        let mut sender = self.authenticate(session)?;

        let mut recipient = self
            .find_by_account_number(to_account_number)?
            .ok_or(Error::RecipientNotFound(to_account_number))?;

        if sender.account_number == recipient.account_number {
            return Err(Error::SelfTransfer);
        }

        if ledger::balance(&sender)? < amount {
            return Err(Error::InsufficientBalance);
        }

        sender.push(Transaction::now(TransactionKind::Withdrawal, amount));
        recipient.push(Transaction::now(TransactionKind::Deposit, amount));
        Self::check_ledger(&sender)?;
        Self::check_ledger(&recipient)?;

        self.store.apply(&[
            Self::account_change(&sender)?,
            Self::account_change(&recipient)?,
        ])
    }

    /// Credit a loan to the session's account; no eligibility check
    pub fn loan(&self, session: &Session, amount: Decimal) -> Result<()> {
        validation::validate_amount(amount)?;

        let _guard = self.guard()?;
        let mut account = self.authenticate(session)?;

        account.push(Transaction::now(TransactionKind::Loan, amount));
        Self::check_ledger(&account)?;
        self.store.apply(&[Self::account_change(&account)?])
    }

    // === Queries ===

    /// The session's account as currently stored
    pub fn account(&self, session: &Session) -> Result<Account> {
        self.authenticate(session)
    }

    pub fn statement(&self, session: &Session) -> Result<Statement> {
        let account = self.authenticate(session)?;
        Statement::from_account(&account)
    }

    /// Session recorded in the store, if any
    ///
    /// Lets a front end that restarts between requests pick the session
    /// back up.
    pub fn current_session(&self) -> Result<Option<Session>> {
        match self.store.get(SESSION_KEY)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Every stored account, in registration order
    pub fn accounts(&self) -> Result<Vec<Account>> {
        let mut accounts = Vec::new();
        for entry in self.load_index()? {
            if let Some(account) = self.load_account(&entry.user_name)? {
                accounts.push(account);
            }
        }
        Ok(accounts)
    }

    pub fn account_count(&self) -> Result<usize> {
        Ok(self.load_index()?.len())
    }

    /// Insert accounts whose user name and account number are both unused
    ///
    /// Returns how many were inserted.
    pub fn seed(&self, accounts: &[Account]) -> Result<usize> {
        let _guard = self.guard()?;
        let mut index = self.load_index()?;
        let mut changes = Vec::new();

        for account in accounts {
            let taken = index.iter().any(|r| {
                r.user_name == account.user_name || r.account_number == account.account_number
            });
            if taken {
                continue;
            }
            index.push(AccountRef::from(account));
            changes.push(Self::account_change(account)?);
        }

        let inserted = changes.len();
        if inserted > 0 {
            changes.push(Self::index_change(&index)?);
            self.store.apply(&changes)?;
        }
        Ok(inserted)
    }

    // === Internals ===

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }

    /// Resolve a session to its account
    ///
    /// The session must be the one recorded in the store and its account
    /// must still exist.
    fn authenticate(&self, session: &Session) -> Result<Account> {
        let active = self.current_session()?.ok_or(Error::NotAuthenticated)?;
        if active.token != session.token || active.user_name != session.user_name {
            return Err(Error::NotAuthenticated);
        }

        self.load_account(&session.user_name)?
            .filter(|a| session.belongs_to(a))
            .ok_or(Error::NotAuthenticated)
    }

    fn load_index(&self) -> Result<Vec<AccountRef>> {
        match self.store.get(ACCOUNTS_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    fn load_account(&self, user_name: &str) -> Result<Option<Account>> {
        match self.store.get(&account_key(user_name))? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn find_by_account_number(&self, account_number: u32) -> Result<Option<Account>> {
        let entry = self
            .load_index()?
            .into_iter()
            .find(|r| r.account_number == account_number);

        match entry {
            Some(entry) => Ok(self
                .load_account(&entry.user_name)?
                .filter(|a| a.account_number == account_number)),
            None => Ok(None),
        }
    }

    fn allocate_account_number<R: Rng + ?Sized>(index: &[AccountRef], rng: &mut R) -> Result<u32> {
        for _ in 0..MAX_ACCOUNT_NUMBER_ATTEMPTS {
            let candidate = Account::generate_account_number(rng);
            if !index.iter().any(|r| r.account_number == candidate) {
                return Ok(candidate);
            }
        }
        Err(Error::AccountNumbersExhausted)
    }

    /// Balance and summary must stay representable before an account is written
    fn check_ledger(account: &Account) -> Result<()> {
        ledger::balance(account)?;
        ledger::summary(account)?;
        Ok(())
    }

    fn account_change(account: &Account) -> Result<Change> {
        Ok(Change::set(account_key(&account.user_name), serde_json::to_value(account)?))
    }

    fn index_change(index: &[AccountRef]) -> Result<Change> {
        Ok(Change::set(ACCOUNTS_KEY, serde_json::to_value(index)?))
    }
}
