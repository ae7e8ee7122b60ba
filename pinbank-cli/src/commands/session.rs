//! Register, login and logout commands

use anyhow::Result;
use colored::Colorize;
use pinbank_core::handlers::{LoginForm, RegisterForm};
use pinbank_core::{Account, Session};

use super::{get_context, pin_or_prompt, submit, value_or_prompt};
use crate::output;

pub fn register(name: Option<String>, user: Option<String>, pin: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let form = RegisterForm {
        full_name: value_or_prompt(name, "Full name")?,
        user_name: value_or_prompt(user, "User name")?,
        pin: pin_or_prompt(pin)?,
    };

    let account = submit::<Account>(&ctx, "register", |h, ok, err| h.register(&form, ok, err))?;

    output::success("Account created");
    println!(
        "  Account number: {}",
        account.account_number.to_string().bold()
    );
    println!("  Interest rate:  {}%", account.interest_rate);
    println!("\nYou are logged in as {}.", account.user_name);
    Ok(())
}

pub fn login(user: Option<String>, pin: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let form = LoginForm {
        user_name: value_or_prompt(user, "User name")?,
        pin: pin_or_prompt(pin)?,
    };

    let session = submit::<Session>(&ctx, "login", |h, ok, err| h.login(&form, ok, err))?;

    let account = ctx.bank_service.account(&session)?;
    let first_name = account.full_name.split_whitespace().next().unwrap_or("");
    output::success(&format!("Welcome back, {}", first_name));
    Ok(())
}

pub fn logout() -> Result<()> {
    let ctx = get_context()?;
    submit::<()>(&ctx, "logout", |h, ok, err| h.logout(|| ok(()), err))?;
    println!("{}", "Logged out".dimmed());
    Ok(())
}
