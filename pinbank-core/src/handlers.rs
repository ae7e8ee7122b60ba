//! Form handlers - the boundary a presentation layer talks to
//!
//! Each handler takes the raw strings a form collected, validates them,
//! runs the matching `BankService` operation against the session recorded
//! in the store, and reports the outcome through exactly one of two
//! callbacks. Handlers never return an error and never panic on bad input.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, OperationResult, Result};
use crate::domain::validation;
use crate::domain::{Account, Session};
use crate::services::{BankService, Statement};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub full_name: String,
    pub user_name: String,
    pub pin: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub user_name: String,
    pub pin: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferForm {
    pub account_number: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoanForm {
    pub amount: String,
}

/// Credentials re-entered to confirm account deletion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteForm {
    pub user_name: String,
    pub pin: String,
}

/// Callback-style facade over `BankService`
pub struct FormHandlers {
    bank: Arc<BankService>,
}

fn respond<T>(result: Result<T>, on_success: impl FnOnce(T), on_error: impl FnOnce(&str)) {
    match result {
        Ok(value) => on_success(value),
        Err(e) => on_error(&e.to_string()),
    }
}

impl FormHandlers {
    pub fn new(bank: Arc<BankService>) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &BankService {
        &self.bank
    }

    /// Register and log in; `on_success` receives the new account
    pub fn register(
        &self,
        form: &RegisterForm,
        on_success: impl FnOnce(Account),
        on_error: impl FnOnce(&str),
    ) {
        respond(self.try_register(form), on_success, on_error)
    }

    pub fn login(
        &self,
        form: &LoginForm,
        on_success: impl FnOnce(Session),
        on_error: impl FnOnce(&str),
    ) {
        respond(self.try_login(form), on_success, on_error)
    }

    pub fn logout(&self, on_success: impl FnOnce(), on_error: impl FnOnce(&str)) {
        let result = self
            .active_session()
            .and_then(|session| self.bank.logout(&session));
        respond(result, |()| on_success(), on_error)
    }

    /// Transfer money; `on_success` receives the refreshed statement
    pub fn transfer(
        &self,
        form: &TransferForm,
        on_success: impl FnOnce(Statement),
        on_error: impl FnOnce(&str),
    ) {
        respond(self.try_transfer(form), on_success, on_error)
    }

    /// Request a loan; `on_success` receives the refreshed statement
    pub fn loan(
        &self,
        form: &LoanForm,
        on_success: impl FnOnce(Statement),
        on_error: impl FnOnce(&str),
    ) {
        respond(self.try_loan(form), on_success, on_error)
    }

    pub fn delete_account(
        &self,
        form: &DeleteForm,
        on_success: impl FnOnce(),
        on_error: impl FnOnce(&str),
    ) {
        respond(self.try_delete(form), |()| on_success(), on_error)
    }

    pub fn dashboard(&self, on_success: impl FnOnce(Statement), on_error: impl FnOnce(&str)) {
        respond(self.try_dashboard(), on_success, on_error)
    }

    /// Dashboard data in serialisable form
    pub fn dashboard_result(&self) -> OperationResult<Statement> {
        OperationResult::from(self.try_dashboard())
    }

    fn active_session(&self) -> Result<Session> {
        self.bank.current_session()?.ok_or(Error::NotAuthenticated)
    }

    fn try_register(&self, form: &RegisterForm) -> Result<Account> {
        let full_name = form.full_name.trim();
        let user_name = form.user_name.trim();
        validation::validate_full_name(full_name)?;
        validation::validate_user_name(user_name)?;
        let pin = validation::parse_pin(&form.pin)?;

        let (account, _session) = self.bank.register(full_name, user_name, pin)?;
        Ok(account)
    }

    fn try_login(&self, form: &LoginForm) -> Result<Session> {
        let user_name = form.user_name.trim();
        validation::validate_user_name(user_name)?;
        let pin = validation::parse_pin(&form.pin)?;

        self.bank.login(user_name, pin)
    }

    fn try_transfer(&self, form: &TransferForm) -> Result<Statement> {
        let to = validation::parse_account_number(&form.account_number)?;
        let amount = validation::parse_amount(&form.amount)?;

        let session = self.active_session()?;
        self.bank.transfer(&session, to, amount)?;
        self.bank.statement(&session)
    }

    fn try_loan(&self, form: &LoanForm) -> Result<Statement> {
        let amount = validation::parse_amount(&form.amount)?;

        let session = self.active_session()?;
        self.bank.loan(&session, amount)?;
        self.bank.statement(&session)
    }

    fn try_delete(&self, form: &DeleteForm) -> Result<()> {
        let user_name = form.user_name.trim();
        validation::validate_user_name(user_name)?;
        let pin = validation::parse_pin(&form.pin)?;

        let session = self.active_session()?;
        self.bank.delete_account(&session, user_name, pin)
    }

    fn try_dashboard(&self) -> Result<Statement> {
        let session = self.active_session()?;
        self.bank.statement(&session)
    }
}
