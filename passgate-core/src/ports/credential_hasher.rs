//! Credential hasher port - one-way password hashing

use async_trait::async_trait;

use crate::domain::HashError;

/// One-way password hashing with constant-time verification
///
/// `hash` is salted, so two calls on the same plaintext return different
/// digests. Digests are self-describing: `verify` reads the salt and cost
/// from the digest rather than from the hasher's current settings.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into an opaque digest
    async fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    /// Check a plaintext password against a digest produced by `hash`
    ///
    /// Returns `Ok(false)` on mismatch. Errors are reserved for malformed
    /// digests and internal failures.
    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HashError>;
}
