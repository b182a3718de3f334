//! Driven port for issuing and verifying bearer tokens.

use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, UserIdentity};

use super::define_port_error;

define_port_error! {
    /// Token failures. Every verification failure is reported to clients the
    /// same way; the variants exist for logs.
    pub enum AccessTokenError {
        /// The token could not be signed.
        Issue { message: String } => "access token could not be issued: {message}",
        /// The token has expired.
        Expired => "access token expired",
        /// Signature, structure or claims are invalid.
        Invalid { message: String } => "access token invalid: {message}",
    }
}

/// Signs and verifies bearer tokens for a user identity.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokens: Send + Sync {
    /// Issue a token for `identity`, valid from `issued_at`.
    fn issue(
        &self,
        identity: &UserIdentity,
        issued_at: DateTime<Utc>,
    ) -> Result<AccessToken, AccessTokenError>;

    /// Verify a token at `now` and return the identity it carries.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserIdentity, AccessTokenError>;
}
