//! Logs command - inspect and prune the event log

use anyhow::{anyhow, Result};
use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use passgate_core::services::logging::{now_ms, LogEntry};
use passgate_core::{EntryPoint, LoggingService};
use serde::Serialize;

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only failed operations
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete entries older than a number of days
    Clear {
        /// Age threshold in days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show entry counts and where the log lives
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct LogStats {
    total_entries: u64,
    error_count: u64,
    database_path: String,
    database_size_bytes: u64,
}

pub fn run(command: LogsCommands) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let service = LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List { limit, errors, json } => list(&service, limit, errors, json),
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => clear(&service, older_than_days, force, json),
        LogsCommands::Stats { json } => stats(&service, json),
    }
}

fn list(service: &LoggingService, limit: usize, errors_only: bool, json: bool) -> Result<()> {
    let entries = if errors_only {
        service.get_errors(limit)?
    } else {
        service.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No log entries found.");
    } else {
        print_entries(entries);
    }
    Ok(())
}

fn print_entries(entries: Vec<LogEntry>) {
    let mut table = output::create_table();
    table.set_header(vec!["Time (UTC)", "Event", "Command", "Outcome"]);

    for entry in entries {
        let outcome = match entry.error_kind {
            Some(kind) => kind.red().to_string(),
            None => "ok".green().to_string(),
        };
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            entry.event,
            entry.command.unwrap_or_else(|| "-".to_string()),
            outcome,
        ]);
    }

    println!("{}", table);
}

fn clear(service: &LoggingService, older_than_days: u64, force: bool, json: bool) -> Result<()> {
    let cutoff_ms = retention_cutoff_ms(now_ms(), older_than_days)?;

    let confirmed = force
        || json
        || Confirm::new()
            .with_prompt(format!(
                "Delete log entries older than {} days?",
                older_than_days
            ))
            .default(false)
            .interact()?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    let deleted = service.delete_before(cutoff_ms)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        output::success(&format!("Deleted {} log entries", deleted));
    }
    Ok(())
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let db_path = service.db_path();
    let stats = LogStats {
        total_entries: service.count()?,
        error_count: service.count_errors()?,
        database_path: db_path.display().to_string(),
        database_size_bytes: std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Event log".bold());
    println!("  Entries:  {}", stats.total_entries);
    println!("  Failures: {}", stats.error_count);
    println!("  Path:     {}", stats.database_path);
    println!("  Size:     {}", output::format_size(stats.database_size_bytes));
    Ok(())
}

/// Unix-ms timestamp `days` before `now_ms`
///
/// Day counts that do not fit a chrono duration, or that reach before the
/// earliest representable instant, are rejected rather than wrapped.
fn retention_cutoff_ms(now_ms: i64, days: u64) -> Result<i64> {
    let out_of_range = || anyhow!("--older-than-days {} is out of range", days);

    let days = i64::try_from(days).map_err(|_| out_of_range())?;
    let age = Duration::try_days(days).ok_or_else(out_of_range)?;
    now_ms
        .checked_sub(age.num_milliseconds())
        .ok_or_else(out_of_range)
}

fn format_timestamp(timestamp_ms: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}
