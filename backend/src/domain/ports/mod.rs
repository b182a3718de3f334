//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`AccountCommand`, `IdentityVerifier`, `UserProfileQuery`,
//! `DocumentGeneration`, `ArtifactQuery`, `HistoryQuery`, `HistoryCommand`)
//! are called by inbound adapters. Driven ports (`UserRepository`,
//! `HistoryRepository`, `DocumentBuilder`, `CredentialHasher`,
//! `AccessTokens`) are implemented by outbound adapters and expose strongly
//! typed errors.

mod macros;
pub(crate) use macros::define_port_error;

mod access_tokens;
mod account_command;
mod credential_hasher;
mod document_builder;
mod document_generation;
mod history_query;
mod history_repository;
mod user_profile_query;
mod user_repository;

#[cfg(test)]
pub use access_tokens::MockAccessTokens;
pub use access_tokens::{AccessTokenError, AccessTokens};
#[cfg(test)]
pub use account_command::{MockAccountCommand, MockIdentityVerifier};
pub use account_command::{
    AccountCommand, FIXTURE_EMAIL, FIXTURE_PASSWORD, FIXTURE_TOKEN, FIXTURE_USER_ID,
    FixtureAccountCommand, FixtureIdentityVerifier, IdentityVerifier,
};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialError, CredentialHasher};
#[cfg(test)]
pub use document_builder::MockDocumentBuilder;
pub use document_builder::{
    ArtifactDownload, ArtifactStream, BuildDocumentPayload, DocumentBuilder, DocumentBuilderError,
};
#[cfg(test)]
pub use document_generation::{MockArtifactQuery, MockDocumentGeneration};
pub use document_generation::{
    ArtifactQuery, DocumentGeneration, FIXTURE_ARTIFACT_BODY, FixtureArtifactQuery,
    FixtureDocumentGeneration,
};
#[cfg(test)]
pub use history_query::{MockHistoryCommand, MockHistoryQuery};
pub use history_query::{FixtureHistoryCommand, FixtureHistoryQuery, HistoryCommand, HistoryQuery};
#[cfg(test)]
pub use history_repository::MockHistoryRepository;
pub use history_repository::{HistoryRepository, HistoryRepositoryError};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::{FixtureUserProfileQuery, UserProfileQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
