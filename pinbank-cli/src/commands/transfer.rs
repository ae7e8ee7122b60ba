//! Transfer command - move money to another account

use anyhow::Result;
use pinbank_core::handlers::TransferForm;
use pinbank_core::Statement;

use super::{get_context, submit};
use crate::output::{self, format_currency};

pub fn run(account: &str, amount: &str) -> Result<()> {
    let ctx = get_context()?;
    let form = TransferForm {
        account_number: account.trim().to_string(),
        amount: amount.to_string(),
    };

    let statement =
        submit::<Statement>(&ctx, "transfer", |h, ok, err| h.transfer(&form, ok, err))?;

    output::success(&format!("Transferred to account {}", form.account_number));
    println!("  Balance: {}", format_currency(statement.balance));
    Ok(())
}
