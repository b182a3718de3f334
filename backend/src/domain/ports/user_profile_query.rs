//! Driving port for user profile queries.
//!
//! Inbound adapters use this port to load the caller's profile without
//! importing persistence details.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::domain::{DisplayName, Error, User, UserId};

use super::account_command::fixture_identity;

/// Domain use-case port for reading the current user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the profile for the authenticated user.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;
}

/// Fixture profile query knowing a single user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileQuery;

#[async_trait]
impl UserProfileQuery for FixtureUserProfileQuery {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        let identity = fixture_identity()?;
        if &identity.user_id != user_id {
            return Err(Error::not_found("user not found"));
        }
        let display_name = DisplayName::new("Ada Lovelace")
            .map_err(|err| Error::internal(format!("invalid fixture display name: {err}")))?;
        let created_at = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| Error::internal("invalid fixture timestamp"))?;
        Ok(User::new(identity.user_id, display_name, identity.email, created_at))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::FIXTURE_USER_ID;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_profile_query_returns_known_user() {
        let user_id = UserId::new(FIXTURE_USER_ID).expect("user id");
        let user = FixtureUserProfileQuery
            .fetch_profile(&user_id)
            .await
            .expect("profile response");
        assert_eq!(user.id(), &user_id);
        assert_eq!(user.display_name().as_ref(), "Ada Lovelace");
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_profile_query_reports_unknown_users() {
        let err = FixtureUserProfileQuery
            .fetch_profile(&UserId::random())
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
