//! Account use-cases: signup, login, bearer verification and profile reads.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use super::ports::{
    AccessTokenError, AccessTokens, AccountCommand, CredentialError, CredentialHasher,
    IdentityVerifier, UserPersistenceError, UserProfileQuery, UserRepository,
};
use super::{
    AccessToken, EmailAddress, Error, LoginCredentials, NewAccount, User, UserAccount, UserId,
    UserIdentity,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const INVALID_TOKEN: &str = "invalid token";

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("email already registered"),
    }
}

fn map_credential_error(error: CredentialError) -> Error {
    warn!(%error, "credential hashing failed");
    Error::internal("credential processing failed")
}

fn map_issue_error(error: AccessTokenError) -> Error {
    warn!(%error, "access token issue failed");
    Error::internal("access token could not be issued")
}

/// Service implementing the account driving ports on top of the user
/// repository, a password hasher and a token signer.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn AccessTokens>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn AccessTokens>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    fn issue_for(&self, user_id: UserId, email: &EmailAddress) -> Result<AccessToken, Error> {
        let identity = UserIdentity {
            user_id,
            email: email.clone(),
        };
        self.tokens
            .issue(&identity, self.clock.utc())
            .map_err(map_issue_error)
    }
}

#[async_trait]
impl AccountCommand for AccountService {
    async fn signup(&self, account: &NewAccount) -> Result<AccessToken, Error> {
        let password_hash = self
            .hasher
            .hash(account.password())
            .await
            .map_err(map_credential_error)?;
        let user = User::new(
            UserId::random(),
            account.display_name().clone(),
            account.email().clone(),
            self.clock.utc(),
        );
        let record = UserAccount {
            user,
            password_hash,
        };
        self.users
            .create(&record)
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %record.user.id(), "account created");
        self.issue_for(*record.user.id(), record.user.email())
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let Some(account) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
        else {
            debug!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await
            .map_err(map_credential_error)?;
        if !matches {
            debug!(user_id = %account.user.id(), "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %account.user.id(), "login succeeded");
        self.issue_for(*account.user.id(), account.user.email())
    }
}

impl IdentityVerifier for AccountService {
    fn verify_bearer(&self, token: &str) -> Result<UserIdentity, Error> {
        self.tokens.verify(token, self.clock.utc()).map_err(|error| {
            debug!(%error, "bearer token rejected");
            Error::forbidden(INVALID_TOKEN)
        })
    }
}

#[async_trait]
impl UserProfileQuery for AccountService {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
