//! Result and error types for the core library

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account field guarded by a store-level unique constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueField {
    Email,
    Username,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Username => "username",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by an `AccountStore` implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A concurrent writer already inserted the same email or username
    #[error("Unique constraint violated on {field}")]
    UniqueConstraintViolation { field: UniqueField },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Failure reported by a `CredentialHasher` implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HashError(pub String);

/// Closed set of failures surfaced by registration and authentication
///
/// Display strings are the messages shown to end users by the CLI.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("User already exists")]
    DuplicateEmail,

    #[error("Username already exists, try with another username.")]
    DuplicateUsername,

    #[error("User not found")]
    AccountNotFound,

    #[error("Invalid password")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Hashing error: {0}")]
    HashingFailure(String),

    #[error("Storage error: {0}")]
    StorageFailure(#[source] StoreError),
}

impl CredentialError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Stable machine-readable code for this error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialError::DuplicateEmail => "duplicate_email",
            CredentialError::DuplicateUsername => "duplicate_username",
            CredentialError::AccountNotFound => "account_not_found",
            CredentialError::InvalidCredentials => "invalid_credentials",
            CredentialError::InvalidInput(_) => "invalid_input",
            CredentialError::HashingFailure(_) => "hashing_failure",
            CredentialError::StorageFailure(_) => "storage_failure",
        }
    }
}

/// Unique-constraint violations resolve to the same kinds the pre-checks produce.
impl From<StoreError> for CredentialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueConstraintViolation {
                field: UniqueField::Email,
            } => CredentialError::DuplicateEmail,
            StoreError::UniqueConstraintViolation {
                field: UniqueField::Username,
            } => CredentialError::DuplicateUsername,
            other => CredentialError::StorageFailure(other),
        }
    }
}

impl From<HashError> for CredentialError {
    fn from(err: HashError) -> Self {
        CredentialError::HashingFailure(err.0)
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Operation result with optional context (for JSON output at the boundary)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result with context
    pub fn fail_with_context(
        error: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: Some(context),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                let mut context = HashMap::new();
                context.insert("kind".to_string(), serde_json::Value::from(e.kind()));
                Self::fail_with_context(e.to_string(), context)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_maps_to_duplicate_kinds() {
        let email: CredentialError = StoreError::UniqueConstraintViolation {
            field: UniqueField::Email,
        }
        .into();
        assert!(matches!(email, CredentialError::DuplicateEmail));

        let username: CredentialError = StoreError::UniqueConstraintViolation {
            field: UniqueField::Username,
        }
        .into();
        assert!(matches!(username, CredentialError::DuplicateUsername));
    }

    #[test]
    fn test_backend_error_maps_to_storage_failure() {
        let err: CredentialError = StoreError::backend("disk full").into();
        assert_eq!(err.kind(), "storage_failure");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_hash_error_maps_to_hashing_failure() {
        let err: CredentialError = HashError("bad digest".to_string()).into();
        assert!(matches!(err, CredentialError::HashingFailure(ref m) if m == "bad digest"));
    }

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_from_result_carries_kind() {
        let err: Result<i32> = Err(CredentialError::InvalidCredentials);
        let result: OperationResult<i32> = err.into();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Invalid password"));
        let context = result.context.unwrap();
        assert_eq!(context["kind"], "invalid_credentials");
    }
}
