//! Delete command - close the logged-in account

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use pinbank_core::handlers::DeleteForm;

use super::{can_prompt, get_context, pin_or_prompt, submit, value_or_prompt};

pub fn run(user: Option<String>, pin: Option<String>, force: bool) -> Result<()> {
    if !force && !can_prompt() {
        anyhow::bail!("Refusing to delete without confirmation: stdin is not a terminal (use --force)");
    }

    let ctx = get_context()?;
    let form = DeleteForm {
        user_name: value_or_prompt(user, "User name")?,
        pin: pin_or_prompt(pin)?,
    };

    // Confirm deletion unless --force
    if !force {
        println!(
            "\n{}",
            "This will permanently delete your account and its history.".yellow()
        );
        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    submit::<()>(&ctx, "delete", |h, ok, err| {
        h.delete_account(&form, || ok(()), err)
    })?;
    println!("\n{} Account deleted\n", "✓".green());
    Ok(())
}
