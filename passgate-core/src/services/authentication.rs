//! Authentication service - password login

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::domain::result::{CredentialError, Result};
use crate::domain::Account;
use crate::ports::{AccountStore, CredentialHasher};

/// Plaintext behind the decoy digest used for unknown emails
const DECOY_PASSWORD: &str = "passgate-decoy-password";

/// Authentication service for email + password logins
pub struct AuthenticationService {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn CredentialHasher>,
    decoy_hash: OnceCell<String>,
}

impl AuthenticationService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            store,
            hasher,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Authenticate by email and password
    ///
    /// Unknown emails fail with `AccountNotFound` and wrong passwords with
    /// `InvalidCredentials`. Both paths cost one lookup plus one verify.
    /// Read-only: nothing is written on success or failure.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account> {
        let Some(account) = self.store.find_by_email(email).await? else {
            self.verify_decoy(password).await;
            return Err(CredentialError::AccountNotFound);
        };

        if !self.hasher.verify(password, &account.password_hash).await? {
            return Err(CredentialError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Hash the decoy digest up front
    ///
    /// Call before serving logins so the first unknown email costs one verify,
    /// like every later one. Without it the digest is built on first use.
    pub async fn prepare_decoy(&self) -> Result<()> {
        self.decoy_digest().await?;
        Ok(())
    }

    async fn decoy_digest(&self) -> Result<&String> {
        let digest = self
            .decoy_hash
            .get_or_try_init(|| self.hasher.hash(DECOY_PASSWORD))
            .await?;
        Ok(digest)
    }

    /// Spend one verify on a throwaway digest. The outcome is discarded.
    async fn verify_decoy(&self, password: &str) {
        if let Ok(digest) = self.decoy_digest().await {
            let _ = self.hasher.verify(password, digest).await;
        }
    }
}
