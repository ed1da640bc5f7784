//! Register command - create a new account

use anyhow::Result;
use colored::Colorize;
use passgate_core::{AccountView, LogEvent, OperationResult};

use super::{credential_failure, get_context, get_logger, get_password_with_confirm, log_event};
use crate::output;

pub async fn run(
    name: &str,
    username: &str,
    email: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let logger = get_logger();
    let password = get_password_with_confirm(password)?;
    let ctx = get_context()?;

    let account = match ctx
        .registration_service
        .register(name, username, email, &password)
        .await
    {
        Ok(account) => {
            log_event(
                &logger,
                LogEvent::new("account_registered").with_command("register"),
            );
            account
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("registration_failed")
                    .with_command("register")
                    .with_credential_error(&e),
            );
            return Err(credential_failure(e, json));
        }
    };

    // The hash never leaves the process
    let view = AccountView::from(&account);

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(view))?);
        return Ok(());
    }

    output::success(&format!("Registered {}", view.username.bold()));
    output::print_account(&view);
    Ok(())
}
