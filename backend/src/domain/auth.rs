//! Authentication primitives: signup details, login credentials and the
//! identity attached to authenticated requests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, UserId, UserValidationError};

/// Domain error returned when signup or login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// E-mail was missing or blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was missing or blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// A present field failed its shape rules.
    #[error(transparent)]
    Field(#[from] UserValidationError),
}

impl CredentialsValidationError {
    /// Name of the request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername
            | Self::Field(UserValidationError::EmptyDisplayName)
            | Self::Field(UserValidationError::DisplayNameTooLong { .. }) => "username",
            Self::EmptyPassword => "password",
            _ => "email",
        }
    }
}

fn require_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.trim().is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

fn require_email(email: &str) -> Result<EmailAddress, CredentialsValidationError> {
    if email.trim().is_empty() {
        return Err(CredentialsValidationError::EmptyEmail);
    }
    Ok(EmailAddress::new(email)?)
}

/// Validated signup details.
///
/// ## Invariants
/// - `display_name` and `email` satisfy their value-type rules.
/// - `password` is non-blank; the raw value is zeroed on drop.
///
/// # Examples
/// ```
/// use backend::domain::NewAccount;
///
/// let account = NewAccount::try_from_parts("Ada", "ada@example.com", "s3cret").unwrap();
/// assert_eq!(account.email().as_ref(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    display_name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl NewAccount {
    /// Construct signup details from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        if username.trim().is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        let display_name = DisplayName::new(username)?;
        let email = require_email(email)?;
        let password = require_password(password)?;
        Ok(Self {
            display_name,
            email,
            password,
        })
    }

    /// Chosen display name.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Normalised login e-mail.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Raw password as supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is normalised to lower case.
/// - `password` is required to be non-blank but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw e-mail/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = require_email(email)?;
        let password = require_password(password)?;
        Ok(Self { email, password })
    }

    /// E-mail used to look up the account.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Identity attached to a request once its bearer token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: UserId,
    pub email: EmailAddress,
}

/// Signed bearer token handed to clients after signup or login.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap an encoded token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Borrow the encoded token.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "ada@example.com", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("   ", "ada@example.com", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("Ada", "", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("Ada", "ada@example.com", "  ", CredentialsValidationError::EmptyPassword)]
    #[case(
        "Ada",
        "not-an-email",
        "pw",
        CredentialsValidationError::Field(UserValidationError::InvalidEmail)
    )]
    fn invalid_signup(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = NewAccount::try_from_parts(username, email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(CredentialsValidationError::EmptyUsername, "username")]
    #[case(CredentialsValidationError::EmptyPassword, "password")]
    #[case(CredentialsValidationError::EmptyEmail, "email")]
    #[case(CredentialsValidationError::Field(UserValidationError::InvalidEmail), "email")]
    fn errors_name_their_field(#[case] error: CredentialsValidationError, #[case] field: &str) {
        assert_eq!(error.field(), field);
    }

    #[rstest]
    fn login_keeps_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("ADA@example.com", " pw ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.email().as_ref(), "ada@example.com");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    fn debug_output_omits_passwords() {
        let account =
            NewAccount::try_from_parts("Ada", "ada@example.com", "hunter2").expect("valid");
        let creds = LoginCredentials::try_from_parts("ada@example.com", "hunter2").expect("valid");
        assert!(!format!("{account:?}").contains("hunter2"));
        assert!(!format!("{creds:?}").contains("hunter2"));
        assert!(!format!("{:?}", AccessToken::new("abc.def.ghi")).contains("abc"));
    }
}
