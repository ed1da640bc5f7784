//! Argon2id credential hasher
//!
//! Digests are PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`), so
//! each one carries the salt and cost it was produced with.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use rand::Rng;

use crate::domain::{HashError, HasherParams};
use crate::ports::CredentialHasher;

/// Salt length in bytes
const SALT_LEN: usize = 16;

/// Argon2id implementation of [`CredentialHasher`]
///
/// Hashing and verification are CPU-bound and run on tokio's blocking pool.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
    params: HasherParams,
}

impl Argon2Hasher {
    pub fn new(params: HasherParams) -> Result<Self, HashError> {
        let argon2_params = Params::new(
            params.memory_cost_kib,
            params.time_cost,
            params.parallelism,
            None,
        )
        .map_err(|e| HashError(format!("Invalid argon2 params: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params),
            params,
        })
    }

    /// Parameters applied to newly hashed passwords
    pub fn params(&self) -> &HasherParams {
        &self.params
    }

    fn hash_blocking(argon2: &Argon2<'static>, plaintext: &[u8]) -> Result<String, HashError> {
        let salt: [u8; SALT_LEN] = rand::thread_rng().gen();
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| HashError(format!("Failed to encode salt: {}", e)))?;

        let digest = argon2
            .hash_password(plaintext, &salt)
            .map_err(|e| HashError(format!("Failed to hash password: {}", e)))?;
        Ok(digest.to_string())
    }

    fn verify_blocking(
        argon2: &Argon2<'static>,
        plaintext: &[u8],
        digest: &str,
    ) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| HashError(format!("Malformed password digest: {}", e)))?;

        // Output comparison inside verify_password is constant-time
        match argon2.verify_password(plaintext, &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError(format!("Failed to verify password: {}", e))),
        }
    }
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let argon2 = self.argon2.clone();
        let plaintext = plaintext.to_owned();

        tokio::task::spawn_blocking(move || Self::hash_blocking(&argon2, plaintext.as_bytes()))
            .await
            .map_err(|e| HashError(format!("Hashing task failed: {}", e)))?
    }

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HashError> {
        let argon2 = self.argon2.clone();
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();

        tokio::task::spawn_blocking(move || {
            Self::verify_blocking(&argon2, plaintext.as_bytes(), &digest)
        })
        .await
        .map_err(|e| HashError(format!("Verification task failed: {}", e)))?
    }
}
