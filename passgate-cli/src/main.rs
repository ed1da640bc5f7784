//! Passgate CLI - account registration and login from the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{login, logs, register, status};

/// Passgate - register accounts and check credentials
#[derive(Parser)]
#[command(name = "passgate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        /// Unique username
        #[arg(long)]
        username: String,
        /// Unique email address
        #[arg(long)]
        email: String,
        /// Password (falls back to PASSGATE_PASSWORD, then a prompt)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check an email and password
    Login {
        /// Account email address
        #[arg(long)]
        email: String,
        /// Password (falls back to PASSGATE_PASSWORD, then a prompt)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show data directory, account count and hasher settings
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { name, username, email, password, json } => {
            register::run(&name, &username, &email, password, json).await
        }
        Commands::Login { email, password, json } => login::run(&email, password, json).await,
        Commands::Status { json } => status::run(json),
        Commands::Logs { command } => logs::run(command),
    }
}
