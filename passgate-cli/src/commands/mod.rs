//! CLI command implementations

pub mod login;
pub mod logs;
pub mod register;
pub mod status;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::Password;
use passgate_core::{
    CredentialError, EntryPoint, LogEvent, LoggingService, OperationResult, PassgateContext,
};

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

/// Get the data directory from PASSGATE_DIR or default to ~/.passgate
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var("PASSGATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".passgate"))
        .context("Could not find home directory; set PASSGATE_DIR")
}

/// Open the passgate context, creating the data directory if needed
pub fn get_context() -> Result<PassgateContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    PassgateContext::new(&data_dir).context("Failed to initialize passgate context")
}

/// Get password from --password flag, PASSGATE_PASSWORD env var, or prompt
pub fn get_password_or_prompt(password_flag: Option<String>, prompt: &str) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }

    if let Ok(p) = env::var("PASSGATE_PASSWORD") {
        return Ok(p);
    }

    let p = Password::new().with_prompt(prompt).interact()?;
    Ok(p)
}

/// Get a new password, prompting twice when it has to be typed
pub fn get_password_with_confirm(password_flag: Option<String>) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }

    if let Ok(p) = env::var("PASSGATE_PASSWORD") {
        return Ok(p);
    }

    let p = Password::new()
        .with_prompt("Choose a password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    Ok(p)
}

/// Print a credential failure (as JSON when requested) and turn it into the command error
pub fn credential_failure(err: CredentialError, json: bool) -> anyhow::Error {
    if json {
        let message = err.to_string();
        let result = OperationResult::<()>::from(Err::<(), _>(err));
        if let Ok(out) = serde_json::to_string_pretty(&result) {
            println!("{}", out);
        }
        return anyhow::anyhow!(message);
    }
    err.into()
}
