//! HS256 JSON Web Token implementation of the `AccessTokens` port.
//!
//! Expiry is checked against the caller-supplied instant rather than the
//! system clock so verification stays deterministic under a mocked clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{AccessTokenError, AccessTokens};
use crate::domain::{AccessToken, EmailAddress, UserId, UserIdentity};

/// Lifetime of an issued token.
pub const ACCESS_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies tokens with one shared secret.
pub struct JwtAccessTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtAccessTokens {
    /// Build a signer from raw secret bytes using the default lifetime.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::days(ACCESS_TOKEN_TTL_DAYS))
    }

    /// Build a signer with an explicit token lifetime.
    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }
}

impl AccessTokens for JwtAccessTokens {
    fn issue(
        &self,
        identity: &UserIdentity,
        issued_at: DateTime<Utc>,
    ) -> Result<AccessToken, AccessTokenError> {
        let claims = Claims {
            sub: identity.user_id.to_string(),
            email: identity.email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|error| AccessTokenError::issue(error.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserIdentity, AccessTokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|error| {
            match error.kind() {
                ErrorKind::ExpiredSignature => AccessTokenError::expired(),
                _ => AccessTokenError::invalid(error.to_string()),
            }
        })?;
        let claims = data.claims;
        if claims.exp <= now.timestamp() {
            return Err(AccessTokenError::expired());
        }
        let user_id = UserId::new(&claims.sub)
            .map_err(|error| AccessTokenError::invalid(format!("sub claim: {error}")))?;
        let email = EmailAddress::new(&claims.email)
            .map_err(|error| AccessTokenError::invalid(format!("email claim: {error}")))?;
        Ok(UserIdentity { user_id, email })
    }
}
