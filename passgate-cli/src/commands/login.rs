//! Login command - check an email and password

use anyhow::Result;
use passgate_core::{AccountView, LogEvent, OperationResult};
use serde::Serialize;

use super::{credential_failure, get_context, get_logger, get_password_or_prompt, log_event};
use crate::output;

#[derive(Debug, Serialize)]
struct LoginOutput {
    message: String,
    user: AccountView,
}

pub async fn run(email: &str, password: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let password = get_password_or_prompt(password, "Password")?;
    let ctx = get_context()?;
    ctx.authentication_service.prepare_decoy().await?;

    let account = match ctx.authentication_service.authenticate(email, &password).await {
        Ok(account) => {
            log_event(&logger, LogEvent::new("login_succeeded").with_command("login"));
            account
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("login_failed")
                    .with_command("login")
                    .with_credential_error(&e),
            );
            return Err(credential_failure(e, json));
        }
    };

    let result = LoginOutput {
        message: "Login successful".to_string(),
        user: AccountView::from(&account),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(result))?);
        return Ok(());
    }

    output::success(&result.message);
    output::print_account(&result.user);
    Ok(())
}
