//! Registration service - account creation with uniqueness checks

use std::sync::Arc;

use crate::domain::result::{CredentialError, Result};
use crate::domain::validation::validate_registration;
use crate::domain::{Account, NewAccount};
use crate::ports::{AccountStore, CredentialHasher};

/// Registration service for new accounts
pub struct RegistrationService {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    /// Register a new account
    ///
    /// The email lookup runs before the username lookup, so a request that
    /// duplicates both reports `DuplicateEmail`. The lookups can race with a
    /// concurrent registration; the store's unique constraint rejects the
    /// loser at `create`, which surfaces as the same duplicate error.
    ///
    /// The returned account still carries its password hash.
    pub async fn register(
        &self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account> {
        validate_registration(name, username, email, password)?;

        if self.store.find_by_email(email).await?.is_some() {
            return Err(CredentialError::DuplicateEmail);
        }

        if self.store.find_by_username(username).await?.is_some() {
            return Err(CredentialError::DuplicateUsername);
        }

        let password_hash = self.hasher.hash(password).await?;

        let account = self
            .store
            .create(NewAccount::new(name, username, email, password_hash))
            .await?;

        Ok(account)
    }
}
