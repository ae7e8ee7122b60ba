//! Status command - the account dashboard

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use pinbank_core::{Statement, TransactionKind};

use super::{get_context, submit};
use crate::output::{self, create_table, format_currency, format_date};

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    if json {
        let result = ctx.handlers.dashboard_result();
        println!("{}", serde_json::to_string_pretty(&result)?);
        if !result.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    let statement = submit::<Statement>(&ctx, "status", |h, ok, err| h.dashboard(ok, err))?;
    print_statement(&statement);
    if ctx.config.demo_mode {
        println!();
        output::warning("Demo mode is on");
    }
    Ok(())
}

fn print_statement(statement: &Statement) {
    let first_name = statement.full_name.split_whitespace().next().unwrap_or("");
    println!("{}", format!("Welcome back, {}", first_name).bold());
    println!();

    let mut table = create_table();
    table.add_row(vec!["Account", &statement.account_number.to_string()]);
    table.add_row(vec!["Balance", &format_currency(statement.balance)]);
    table.add_row(vec!["In", &format_currency(statement.summary.incomes)]);
    table.add_row(vec!["Out", &format_currency(statement.summary.outcomes)]);
    table.add_row(vec!["Interest", &format_currency(statement.summary.interest)]);
    table.add_row(vec!["Interest rate", &format!("{}%", statement.interest_rate)]);
    println!("{}", table);
    println!();

    if statement.transactions.is_empty() {
        println!("{}", "No transactions yet".dimmed());
        return;
    }

    println!("{}", "Transactions".bold());
    let now = Utc::now();
    let count = statement.transactions.len();
    let mut history = create_table();
    history.set_header(vec!["#", "Type", "Date", "Amount"]);
    for (i, tx) in statement.transactions.iter().enumerate() {
        let kind = match tx.kind {
            TransactionKind::Deposit => tx.kind.as_str().green().to_string(),
            TransactionKind::Loan => tx.kind.as_str().cyan().to_string(),
            TransactionKind::Withdrawal => tx.kind.as_str().red().to_string(),
        };
        history.add_row(vec![
            (count - i).to_string(),
            kind,
            format_date(tx.date, now),
            format_currency(tx.signed_amount()),
        ]);
    }
    println!("{}", history);
}
