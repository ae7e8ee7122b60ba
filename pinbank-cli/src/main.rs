//! PinBank CLI - a PIN-protected bank in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{delete, demo, loan, logs, session, status, transfer};

/// PinBank - a PIN-protected bank in your terminal
#[derive(Parser)]
#[command(name = "pb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a new account and log in
    Register {
        /// Full name (letters and spaces)
        #[arg(long)]
        name: Option<String>,
        /// User name (lowercase letters and digits)
        #[arg(long, short)]
        user: Option<String>,
        /// 4-digit PIN
        #[arg(long, env = "PINBANK_PIN", hide_env_values = true)]
        pin: Option<String>,
    },

    /// Log in to an existing account
    Login {
        /// User name
        #[arg(long, short)]
        user: Option<String>,
        /// 4-digit PIN
        #[arg(long, env = "PINBANK_PIN", hide_env_values = true)]
        pin: Option<String>,
    },

    /// Log out of the current account
    Logout,

    /// Show balance, summary and transaction history
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer money to another account
    Transfer {
        /// Recipient account number (6 digits)
        account: String,
        /// Amount to transfer
        amount: String,
    },

    /// Request a loan
    Loan {
        /// Amount to borrow
        amount: String,
    },

    /// Close the current account
    Delete {
        /// User name (confirms the account to close)
        #[arg(long, short)]
        user: Option<String>,
        /// 4-digit PIN
        #[arg(long, env = "PINBANK_PIN", hide_env_values = true)]
        pin: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { name, user, pin } => session::register(name, user, pin),
        Commands::Login { user, pin } => session::login(user, pin),
        Commands::Logout => session::logout(),
        Commands::Status { json } => status::run(json),
        Commands::Transfer { account, amount } => transfer::run(&account, &amount),
        Commands::Loan { amount } => loan::run(&amount),
        Commands::Delete { user, pin, force } => delete::run(user, pin, force),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
