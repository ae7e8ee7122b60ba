//! Loan command

use anyhow::Result;
use pinbank_core::handlers::LoanForm;
use pinbank_core::Statement;

use super::{get_context, submit};
use crate::output::{self, format_currency};

pub fn run(amount: &str) -> Result<()> {
    let ctx = get_context()?;
    let form = LoanForm {
        amount: amount.to_string(),
    };

    let statement = submit::<Statement>(&ctx, "loan", |h, ok, err| h.loan(&form, ok, err))?;

    output::success("Loan granted");
    println!("  Balance:  {}", format_currency(statement.balance));
    println!("  Interest: {}", format_currency(statement.summary.interest));
    Ok(())
}
