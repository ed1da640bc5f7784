//! Account store port - persistence abstraction

use async_trait::async_trait;

use crate::domain::{Account, NewAccount, StoreError};

/// Persistent record store for accounts
///
/// Implementations must enforce uniqueness of `email` and of `username`
/// themselves. The registration pre-checks are advisory: two concurrent
/// registrations can both pass them, and `create` is the only place the
/// race is resolved. A rejected insert must leave no record behind and
/// report `StoreError::UniqueConstraintViolation` naming the field.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Look up an account by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Persist a new account, assigning its id and creation time
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;
}
