//! Driven port for salted password hashing.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential hashing adapters.
    pub enum CredentialError {
        /// The hash could not be produced.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes and verifies passwords. Implementations must be slow by design and
/// must not block the async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted hash of `password`.
    async fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError>;

    /// Check `password` against a stored hash. A mismatch is `Ok(false)`.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialError>;
}
