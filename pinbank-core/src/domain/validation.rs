//! Input rules for names, PINs, account numbers and amounts
//!
//! Front ends run the `parse_*` functions on raw form input; the bank
//! service re-checks already-parsed values with the `validate_*` ones.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::result::{Error, Result};

pub const FULL_NAME_MAX_LEN: usize = 50;
pub const USER_NAME_MAX_LEN: usize = 12;
/// Largest amount a single transfer or loan may move
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

static FULL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("full name pattern"));
static USER_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("user name pattern"));
static PIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").expect("pin pattern"));
static ACCOUNT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("account number pattern"));

pub fn validate_full_name(full_name: &str) -> Result<()> {
    if !FULL_NAME_RE.is_match(full_name) {
        return Err(Error::validation(
            "The full name should contain alphabetic characters only.",
        ));
    }
    if full_name.chars().count() > FULL_NAME_MAX_LEN {
        return Err(Error::validation(format!(
            "The full name should not exceed {} characters.",
            FULL_NAME_MAX_LEN
        )));
    }
    Ok(())
}

pub fn validate_user_name(user_name: &str) -> Result<()> {
    if !USER_NAME_RE.is_match(user_name) {
        return Err(Error::validation(
            "The username should contain lowercase alphabetic characters and numbers only.",
        ));
    }
    if user_name.len() > USER_NAME_MAX_LEN {
        return Err(Error::validation(format!(
            "The username must not exceed {} characters.",
            USER_NAME_MAX_LEN
        )));
    }
    Ok(())
}

pub fn validate_pin(pin: u16) -> Result<()> {
    if pin > 9999 {
        return Err(pin_error());
    }
    Ok(())
}

/// Parse exactly four digits; "0042" becomes 42
pub fn parse_pin(input: &str) -> Result<u16> {
    if !PIN_RE.is_match(input) {
        return Err(pin_error());
    }
    input.parse().map_err(|_| pin_error())
}

/// Parse exactly six digits
pub fn parse_account_number(input: &str) -> Result<u32> {
    let err = || Error::validation("The account number must be exactly 6 digits long.");
    if !ACCOUNT_NUMBER_RE.is_match(input) {
        return Err(err());
    }
    input.parse().map_err(|_| err())
}

pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(amount_error());
    }
    if amount > MAX_AMOUNT {
        return Err(Error::validation(format!(
            "The amount must not exceed {}.",
            MAX_AMOUNT
        )));
    }
    Ok(())
}

/// Parse a strictly positive amount no larger than [`MAX_AMOUNT`]
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(input.trim()).map_err(|_| amount_error())?;
    validate_amount(amount)?;
    Ok(amount)
}

fn pin_error() -> Error {
    Error::validation("The PIN must be exactly 4 digits long.")
}

fn amount_error() -> Error {
    Error::validation("The transfer amount must be a number greater than 0.")
}
