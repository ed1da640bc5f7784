//! Status command - show data directory, account count and hasher settings

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::get_context;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusSummary {
    data_dir: String,
    database_path: String,
    database_size_bytes: u64,
    total_accounts: i64,
    hasher: HasherSummary,
}

#[derive(Debug, Serialize)]
struct HasherSummary {
    algorithm: &'static str,
    memory_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let params = ctx.hasher.params();
    let db_path = ctx.store.db_path();

    let status = StatusSummary {
        data_dir: ctx.data_dir.display().to_string(),
        database_path: db_path.display().to_string(),
        database_size_bytes: std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0),
        total_accounts: ctx.store.count_accounts()?,
        hasher: HasherSummary {
            algorithm: "argon2id",
            memory_cost_kib: params.memory_cost_kib,
            time_cost: params.time_cost,
            parallelism: params.parallelism,
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Passgate Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Data directory", status.data_dir.as_str()]);
    table.add_row(vec!["Database", status.database_path.as_str()]);
    table.add_row(vec![
        "Database size".to_string(),
        output::format_size(status.database_size_bytes),
    ]);
    table.add_row(vec!["Accounts".to_string(), status.total_accounts.to_string()]);
    table.add_row(vec![
        "Hasher".to_string(),
        format!(
            "{} (m={} KiB, t={}, p={})",
            status.hasher.algorithm,
            status.hasher.memory_cost_kib,
            status.hasher.time_cost,
            status.hasher.parallelism
        ),
    ]);
    println!("{}", table);

    Ok(())
}
