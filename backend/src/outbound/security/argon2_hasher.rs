//! Argon2id implementation of the `CredentialHasher` port.
//!
//! Hashing is CPU bound, so both operations run on the blocking pool with the
//! caller's trace id carried across.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialError, CredentialHasher};
use crate::domain::{PasswordHash, TraceId};

/// Hasher producing salted Argon2id PHC strings with the crate defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2CredentialHasher;

fn hash_blocking(password: &[u8]) -> Result<PasswordHash, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password, &salt)
        .map(|phc| PasswordHash::new(phc.to_string()))
        .map_err(|error| CredentialError::hashing(error.to_string()))
}

fn verify_blocking(password: &[u8], stored: &str) -> Result<bool, CredentialError> {
    let parsed = password_hash::PasswordHash::new(stored)
        .map_err(|error| CredentialError::malformed_hash(error.to_string()))?;
    match Argon2::default().verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(error) => Err(CredentialError::malformed_hash(error.to_string())),
    }
}

fn join_error(error: tokio::task::JoinError) -> CredentialError {
    CredentialError::hashing(format!("hashing task failed: {error}"))
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        TraceId::spawn_blocking(move || hash_blocking(&password))
            .await
            .map_err(join_error)?
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        let stored = hash.as_str().to_owned();
        TraceId::spawn_blocking(move || verify_blocking(&password, &stored))
            .await
            .map_err(join_error)?
    }
}
