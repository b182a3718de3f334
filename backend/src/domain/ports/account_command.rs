//! Driving ports for account use-cases: signup, login and bearer checks.
//!
//! Inbound adapters call these without knowing how credentials are hashed or
//! tokens are signed, which keeps handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{AccessToken, EmailAddress, Error, LoginCredentials, NewAccount, UserId, UserIdentity};

/// Domain use-case port for creating accounts and logging in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new account and return a bearer token for it.
    async fn signup(&self, account: &NewAccount) -> Result<AccessToken, Error>;

    /// Check credentials and return a bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;
}

/// Domain use-case port for turning a bearer token into an identity.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a raw token. Failures are [`crate::domain::ErrorCode::Forbidden`].
    fn verify_bearer(&self, token: &str) -> Result<UserIdentity, Error>;
}

/// Token accepted by the fixture ports.
pub const FIXTURE_TOKEN: &str = "fixture-token";
/// User id carried by [`FIXTURE_TOKEN`].
pub const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
/// E-mail carried by [`FIXTURE_TOKEN`].
pub const FIXTURE_EMAIL: &str = "ada@example.com";
/// Password accepted by [`FixtureAccountCommand::login`].
pub const FIXTURE_PASSWORD: &str = "password";

pub(crate) fn fixture_identity() -> Result<UserIdentity, Error> {
    let user_id = UserId::new(FIXTURE_USER_ID)
        .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
    let email = EmailAddress::new(FIXTURE_EMAIL)
        .map_err(|err| Error::internal(format!("invalid fixture email: {err}")))?;
    Ok(UserIdentity { user_id, email })
}

/// In-memory account command used by handler tests.
///
/// Signup always succeeds except for [`FIXTURE_EMAIL`], which is treated as
/// already registered. Login accepts only the fixture credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountCommand;

#[async_trait]
impl AccountCommand for FixtureAccountCommand {
    async fn signup(&self, account: &NewAccount) -> Result<AccessToken, Error> {
        if account.email().as_ref() == FIXTURE_EMAIL {
            return Err(Error::conflict("email already registered"));
        }
        Ok(AccessToken::new(FIXTURE_TOKEN))
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        if credentials.email().as_ref() == FIXTURE_EMAIL && credentials.password() == FIXTURE_PASSWORD {
            Ok(AccessToken::new(FIXTURE_TOKEN))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

/// Verifier accepting only [`FIXTURE_TOKEN`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityVerifier;

impl IdentityVerifier for FixtureIdentityVerifier {
    fn verify_bearer(&self, token: &str) -> Result<UserIdentity, Error> {
        if token == FIXTURE_TOKEN {
            fixture_identity()
        } else {
            Err(Error::forbidden("invalid token"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(FIXTURE_EMAIL, FIXTURE_PASSWORD, None)]
    #[case(FIXTURE_EMAIL, "wrong", Some(ErrorCode::Unauthorized))]
    #[case("other@example.com", FIXTURE_PASSWORD, Some(ErrorCode::Unauthorized))]
    #[tokio::test]
    async fn fixture_login(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected_error: Option<ErrorCode>,
    ) {
        let creds = LoginCredentials::try_from_parts(email, password).expect("credentials shape");
        let result = FixtureAccountCommand.login(&creds).await;
        assert_eq!(result.err().map(|err| err.code()), expected_error);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_signup_rejects_taken_email() {
        let account =
            NewAccount::try_from_parts("Ada", FIXTURE_EMAIL, "pw").expect("account shape");
        let err = FixtureAccountCommand
            .signup(&account)
            .await
            .expect_err("duplicate email");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case(FIXTURE_TOKEN, true)]
    #[case("tampered", false)]
    fn fixture_verifier(#[case] token: &str, #[case] accepted: bool) {
        let result = FixtureIdentityVerifier.verify_bearer(token);
        match (accepted, result) {
            (true, Ok(identity)) => assert_eq!(identity.user_id.to_string(), FIXTURE_USER_ID),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Forbidden),
            (_, other) => panic!("unexpected verification result: {other:?}"),
        }
    }
}
