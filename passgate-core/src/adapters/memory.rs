//! In-memory account store
//!
//! Used by tests and by embedders that do not need persistence. Uniqueness
//! is checked and the record inserted under a single lock, so the store
//! behaves like a database unique constraint under concurrent writers.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Account, NewAccount, StoreError, UniqueField};
use crate::ports::AccountStore;

#[derive(Default)]
struct Records {
    accounts: HashMap<Uuid, Account>,
    by_email: HashMap<String, Uuid>,
    by_username: HashMap<String, Uuid>,
}

/// Account store backed by process memory
#[derive(Default)]
pub struct InMemoryAccountStore {
    records: Mutex<Records>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.accounts.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Records>, StoreError> {
        self.records
            .lock()
            .map_err(|e| StoreError::backend(format!("Lock poisoned: {}", e)))
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let records = self.lock()?;
        Ok(records
            .by_email
            .get(email)
            .and_then(|id| records.accounts.get(id))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let records = self.lock()?;
        Ok(records
            .by_username
            .get(username)
            .and_then(|id| records.accounts.get(id))
            .cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut records = self.lock()?;

        if records.by_email.contains_key(&account.email) {
            return Err(StoreError::UniqueConstraintViolation {
                field: UniqueField::Email,
            });
        }
        if records.by_username.contains_key(&account.username) {
            return Err(StoreError::UniqueConstraintViolation {
                field: UniqueField::Username,
            });
        }

        let account = account.into_account(Uuid::new_v4(), Utc::now());
        records.by_email.insert(account.email.clone(), account.id);
        records.by_username.insert(account.username.clone(), account.id);
        records.accounts.insert(account.id, account.clone());

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount::new("Test", username, email, "$argon2id$stub")
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryAccountStore::new();
        let created = store.create(new_account("alice1", "a@x.com")).await.unwrap();

        let by_email = store.find_by_email("a@x.com").await.unwrap().unwrap();
        let by_username = store.find_by_username("alice1").await.unwrap().unwrap();
        assert_eq!(by_email, created);
        assert_eq!(by_username, created);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_lookup_is_exact_match() {
        let store = InMemoryAccountStore::new();
        store.create(new_account("alice1", "a@x.com")).await.unwrap();

        assert!(store.find_by_email("A@X.COM").await.unwrap().is_none());
        assert!(store.find_by_username("Alice1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_without_insert() {
        let store = InMemoryAccountStore::new();
        store.create(new_account("alice1", "a@x.com")).await.unwrap();

        let err = store.create(new_account("alice2", "a@x.com")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::UniqueConstraintViolation {
                field: UniqueField::Email
            }
        );
        assert!(store.find_by_username("alice2").await.unwrap().is_none());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_without_insert() {
        let store = InMemoryAccountStore::new();
        store.create(new_account("alice1", "a@x.com")).await.unwrap();

        let err = store.create(new_account("alice1", "b@x.com")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::UniqueConstraintViolation {
                field: UniqueField::Username
            }
        );
        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_an_error_not_empty() {
        let store = std::sync::Arc::new(InMemoryAccountStore::new());
        store.create(new_account("alice1", "a@x.com")).await.unwrap();

        let poisoner = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.records.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::Backend(_))));
        assert!(store.is_empty().is_err());
    }
}
