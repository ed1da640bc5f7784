//! Account domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user identity
///
/// Carries the stored password hash. Anything leaving the process should
/// go through [`AccountView`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    /// PHC-format digest; salt and cost are embedded
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for an account that has not been persisted yet
///
/// Only ever holds a hash. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Materialize into a stored account
    pub fn into_account(self, id: Uuid, created_at: DateTime<Utc>) -> Account {
        Account {
            id,
            name: self.name,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at,
        }
    }
}

/// Account as exposed outside the core (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_into_account() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let account = NewAccount::new("Alice", "alice1", "a@x.com", "$argon2id$digest")
            .into_account(id, now);

        assert_eq!(account.id, id);
        assert_eq!(account.username, "alice1");
        assert_eq!(account.email, "a@x.com");
        assert_eq!(account.password_hash, "$argon2id$digest");
        assert_eq!(account.created_at, now);
    }

    #[test]
    fn test_view_strips_password_hash() {
        let account = NewAccount::new("Alice", "alice1", "a@x.com", "$argon2id$digest")
            .into_account(Uuid::new_v4(), Utc::now());
        let view = AccountView::from(&account);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
        assert_eq!(view.username, "alice1");
    }
}
