//! Migration service - manages database schema migrations
//!
//! Migrations are SQL files embedded at compile time. Each migration is
//! tracked in the sys_migrations table to ensure idempotent execution.
//! The same service drives both the account database and the log database;
//! only the migration set differs.

use anyhow::{Context, Result};
use duckdb::Connection;

/// Name of the bootstrap migration that creates sys_migrations
const BOOTSTRAP: &str = "000_migrations.sql";

/// Result of running migrations
#[derive(Debug)]
pub struct MigrationResult {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied
    pub already_applied: usize,
}

/// Service for managing database migrations
pub struct MigrationService<'a> {
    conn: &'a Connection,
    migrations: &'static [(&'static str, &'static str)],
}

impl<'a> MigrationService<'a> {
    /// Create a migration service for one database and its migration set
    pub fn new(conn: &'a Connection, migrations: &'static [(&'static str, &'static str)]) -> Self {
        Self { conn, migrations }
    }

    /// Run all pending migrations in order
    pub fn run_pending(&self) -> Result<MigrationResult> {
        let mut newly_applied = Vec::new();

        if !self.migrations_table_exists()? {
            if let Some((name, sql)) = self.migrations.iter().find(|(n, _)| *n == BOOTSTRAP) {
                self.apply(name, sql)?;
                newly_applied.push(name.to_string());
            }
        }

        let applied_set = self.get_applied()?;
        let already_applied = applied_set.len() - newly_applied.len();

        for (name, sql) in self.migrations.iter() {
            if *name == BOOTSTRAP || applied_set.iter().any(|a| a == name) {
                continue;
            }
            self.apply(name, sql)?;
            newly_applied.push(name.to_string());
        }

        Ok(MigrationResult {
            applied: newly_applied,
            already_applied,
        })
    }

    /// Get list of already applied migration names
    pub fn get_applied(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT migration_name FROM sys_migrations ORDER BY migration_name")?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut result = Vec::new();
        for name in names {
            result.push(name?);
        }
        Ok(result)
    }

    fn migrations_table_exists(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_migrations'",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);
        Ok(count > 0)
    }

    fn apply(&self, name: &str, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .with_context(|| format!("Failed to apply migration {}", name))?;
        self.conn.execute(
            "INSERT INTO sys_migrations (migration_name) VALUES (?)",
            [name],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_migrations::LOG_MIGRATIONS;
    use crate::migrations::MIGRATIONS;

    #[test]
    fn test_migrations_run_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        let service = MigrationService::new(&conn, MIGRATIONS);

        let result = service.run_pending().unwrap();
        assert_eq!(result.applied.len(), MIGRATIONS.len());
        assert_eq!(result.already_applied, 0);

        // Running again should apply nothing
        let again = service.run_pending().unwrap();
        assert!(again.applied.is_empty());
        assert_eq!(again.already_applied, MIGRATIONS.len());
    }

    #[test]
    fn test_applied_names_are_recorded() {
        let conn = Connection::open_in_memory().unwrap();
        let service = MigrationService::new(&conn, MIGRATIONS);

        service.run_pending().unwrap();
        let applied = service.get_applied().unwrap();
        let expected: Vec<String> = MIGRATIONS.iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(applied, expected);
    }

    #[test]
    fn test_accounts_table_enforces_unique_email() {
        let conn = Connection::open_in_memory().unwrap();
        MigrationService::new(&conn, MIGRATIONS).run_pending().unwrap();

        let insert = "INSERT INTO sys_accounts (account_id, name, username, email, password_hash, created_at)
                      VALUES (?, 'A', ?, ?, 'h', '2024-01-01T00:00:00+00:00')";
        conn.execute(insert, ["id-1", "alice1", "a@x.com"]).unwrap();
        assert!(conn.execute(insert, ["id-2", "alice2", "a@x.com"]).is_err());
        assert!(conn.execute(insert, ["id-3", "alice1", "b@x.com"]).is_err());
    }

    #[test]
    fn test_log_migrations_are_independent() {
        let conn = Connection::open_in_memory().unwrap();
        let result = MigrationService::new(&conn, LOG_MIGRATIONS).run_pending().unwrap();

        assert_eq!(result.applied.len(), LOG_MIGRATIONS.len());
        let accounts_exists: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_accounts'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(accounts_exists, 0);
    }
}
