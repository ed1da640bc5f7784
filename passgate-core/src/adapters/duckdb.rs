//! DuckDB account store implementation

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::{params, Connection};
use uuid::Uuid;

use crate::domain::{Account, NewAccount, StoreError, UniqueField};
use crate::migrations::MIGRATIONS;
use crate::ports::AccountStore;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const SELECT_ACCOUNT: &str =
    "SELECT account_id, name, username, email, password_hash, created_at FROM sys_accounts";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Extract the violated column from a DuckDB constraint error
///
/// DuckDB reports `Constraint Error: Duplicate key "email: a@x.com" violates
/// unique constraint`. The column name precedes the first colon of the key.
fn unique_violation_field(err_msg: &str) -> Option<UniqueField> {
    if !err_msg.contains("Constraint Error") {
        return None;
    }
    let key = err_msg.split("Duplicate key \"").nth(1)?;
    let column = key.split(':').next()?.trim();
    match column {
        "email" => Some(UniqueField::Email),
        "username" => Some(UniqueField::Username),
        _ => None,
    }
}

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        let msg = err.to_string();
        match unique_violation_field(&msg) {
            Some(field) => StoreError::UniqueConstraintViolation { field },
            None => StoreError::Backend(msg),
        }
    }
}

/// Raw column values of one sys_accounts row
type AccountRow = (String, String, String, String, String, String);

fn read_account_row(row: &duckdb::Row) -> duckdb::Result<AccountRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn row_to_account(row: AccountRow) -> Result<Account, StoreError> {
    let (id, name, username, email, password_hash, created_at) = row;
    let id = Uuid::parse_str(&id)
        .map_err(|e| StoreError::backend(format!("Corrupt account id {:?}: {}", id, e)))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::backend(format!("Corrupt created_at {:?}: {}", created_at, e)))?;

    Ok(Account {
        id,
        name,
        username,
        email,
        password_hash,
        created_at,
    })
}

fn find_one(conn: &Connection, column: &str, value: &str) -> Result<Option<Account>, StoreError> {
    let sql = format!("{} WHERE {} = ?", SELECT_ACCOUNT, column);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map([value], read_account_row)?;

    match rows.next() {
        Some(row) => Ok(Some(row_to_account(row?)?)),
        None => Ok(None),
    }
}

/// Report an email clash ahead of a username clash
///
/// DuckDB checks unique indexes in column order, so an insert duplicating both
/// fields surfaces the username violation. Runs under the connection lock the
/// failed insert held.
fn email_takes_precedence(conn: &Connection, email: &str, err: StoreError) -> StoreError {
    let username_clash = matches!(
        err,
        StoreError::UniqueConstraintViolation {
            field: UniqueField::Username
        }
    );
    if !username_clash {
        return err;
    }

    match find_one(conn, "email", email) {
        Ok(Some(_)) => StoreError::UniqueConstraintViolation {
            field: UniqueField::Email,
        },
        Ok(None) => err,
        Err(lookup_err) => lookup_err,
    }
}

/// DuckDB account store
///
/// One connection shared behind a mutex; every port call runs on tokio's
/// blocking pool so database I/O never stalls the async executor.
pub struct DuckDbAccountStore {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl DuckDbAccountStore {
    /// Open (or create) the account database
    ///
    /// Includes retry logic with exponential backoff for file locking errors,
    /// which occur when another process (e.g. a second CLI invocation) holds
    /// the database file.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Arc::new(Mutex::new(conn)),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[passgate] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading is never needed for this schema
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    /// Run pending schema migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Total number of registered accounts
    pub fn count_accounts(&self) -> Result<i64> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_accounts", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get the path to the account database
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::backend(format!("Lock poisoned: {}", e)))?;
            op(&conn)
        })
        .await
        .map_err(|e| StoreError::backend(format!("Database task failed: {}", e)))?
    }
}

#[async_trait]
impl AccountStore for DuckDbAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let email = email.to_owned();
        self.with_conn(move |conn| find_one(conn, "email", &email)).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let username = username.to_owned();
        self.with_conn(move |conn| find_one(conn, "username", &username))
            .await
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        self.with_conn(move |conn| {
            let id = Uuid::new_v4();
            let created_at = Utc::now();

            // A single INSERT is atomic: either both unique indexes accept it or nothing is written
            let inserted = conn.execute(
                "INSERT INTO sys_accounts (account_id, name, username, email, password_hash, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    id.to_string(),
                    &account.name,
                    &account.username,
                    &account.email,
                    &account.password_hash,
                    created_at.to_rfc3339(),
                ],
            );

            match inserted.map_err(StoreError::from) {
                Ok(_) => Ok(account.into_account(id, created_at)),
                Err(err) => Err(email_takes_precedence(conn, &account.email, err)),
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_email_violation() {
        let msg = "Constraint Error: Duplicate key \"email: a@x.com\" violates unique constraint.";
        assert_eq!(unique_violation_field(msg), Some(UniqueField::Email));
    }

    #[test]
    fn test_parses_username_violation() {
        let msg = "Constraint Error: Duplicate key \"username: alice1\" violates unique constraint. \
                   If this is an unexpected constraint violation please double check with the \
                   known index limitations section in our documentation";
        assert_eq!(unique_violation_field(msg), Some(UniqueField::Username));
    }

    #[test]
    fn test_value_containing_column_name_is_not_confused() {
        let msg = "Constraint Error: Duplicate key \"username: email: x\" violates unique constraint.";
        assert_eq!(unique_violation_field(msg), Some(UniqueField::Username));
    }

    #[test]
    fn test_other_errors_are_not_violations() {
        assert_eq!(unique_violation_field("IO Error: could not open file"), None);
        assert_eq!(
            unique_violation_field(
                "Constraint Error: Duplicate key \"account_id: 1\" violates primary key constraint."
            ),
            None
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(is_retryable_error("IO Error: database is locked"));
        assert!(is_retryable_error("The process cannot access the file because it is being used by another process"));
        assert!(!is_retryable_error("Catalog Error: table does not exist"));
    }

    fn open_store(dir: &tempfile::TempDir) -> DuckDbAccountStore {
        let store = DuckDbAccountStore::new(&dir.path().join("accounts.duckdb")).unwrap();
        store.ensure_schema().unwrap();
        store
    }

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount::new("Test", username, email, "$argon2id$stub")
    }

    #[tokio::test]
    async fn test_duplicate_email_and_username_reports_email() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        store.create(new_account("alice1", "a@x.com")).await.unwrap();

        let err = store.create(new_account("alice1", "a@x.com")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::UniqueConstraintViolation {
                field: UniqueField::Email
            }
        );
        assert_eq!(store.count_accounts().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_only_reports_username() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        store.create(new_account("alice1", "a@x.com")).await.unwrap();

        let err = store.create(new_account("alice1", "b@x.com")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::UniqueConstraintViolation {
                field: UniqueField::Username
            }
        );
    }

    #[test]
    fn test_row_to_account_rejects_corrupt_id() {
        let row = (
            "not-a-uuid".to_string(),
            "A".to_string(),
            "alice1".to_string(),
            "a@x.com".to_string(),
            "h".to_string(),
            Utc::now().to_rfc3339(),
        );
        assert!(matches!(row_to_account(row), Err(StoreError::Backend(_))));
    }
}
