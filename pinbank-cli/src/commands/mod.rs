//! CLI command implementations

pub mod delete;
pub mod demo;
pub mod loan;
pub mod logs;
pub mod session;
pub mod status;
pub mod transfer;

use std::cell::RefCell;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use dialoguer::{Input, Password};
use pinbank_core::services::{EntryPoint, LogEvent, LoggingService};
use pinbank_core::{BankContext, FormHandlers};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PINBANK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".pinbank"))
}

/// Open the bank for the configured data directory
pub fn get_context() -> Result<BankContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    BankContext::new(&data_dir).context("Failed to open the bank")
}

/// Run a form handler and turn whichever callback fired into a Result
///
/// Both outcomes are recorded in the event log: `command` on success,
/// `<command>_failed` with the message otherwise.
pub fn submit<T>(
    ctx: &BankContext,
    command: &str,
    run: impl FnOnce(&FormHandlers, &dyn Fn(T), &dyn Fn(&str)),
) -> Result<T> {
    let outcome: RefCell<Option<std::result::Result<T, String>>> = RefCell::new(None);
    run(
        &ctx.handlers,
        &|value: T| *outcome.borrow_mut() = Some(Ok(value)),
        &|message: &str| *outcome.borrow_mut() = Some(Err(message.to_string())),
    );

    let logger = get_logger();
    let storage = ctx.config.storage.as_str();
    match outcome.into_inner() {
        Some(Ok(value)) => {
            log_event(
                &logger,
                LogEvent::new(command)
                    .with_command(command)
                    .with_storage(storage),
            );
            Ok(value)
        }
        Some(Err(message)) => {
            log_event(
                &logger,
                LogEvent::new(format!("{}_failed", command))
                    .with_command(command)
                    .with_storage(storage)
                    .with_error(&message),
            );
            Err(anyhow!(message))
        }
        None => Err(anyhow!("{} finished without a result", command)),
    }
}

/// Is stdin attached to a terminal we can prompt on
pub fn can_prompt() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Use the flag value or ask for it interactively
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    if !can_prompt() {
        anyhow::bail!("{} is required when stdin is not a terminal", prompt);
    }
    let v = Input::new().with_prompt(prompt).interact_text()?;
    Ok(v)
}

/// Use the --pin flag / PINBANK_PIN, or prompt without echo
pub fn pin_or_prompt(pin: Option<String>) -> Result<String> {
    if let Some(p) = pin {
        return Ok(p);
    }
    if !can_prompt() {
        anyhow::bail!("PIN is required when stdin is not a terminal (use --pin or PINBANK_PIN)");
    }
    let p = Password::new().with_prompt("PIN").interact()?;
    Ok(p)
}
