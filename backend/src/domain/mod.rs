//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services that implement the driving ports.
//! Keep types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User, UserAccount — registered users and their stored credentials.
//! - NewAccount, LoginCredentials, UserIdentity, AccessToken — auth inputs
//!   and outputs.
//! - ExtractionSummary — shallow structural facts about an uploaded file.
//! - HistoryRecord, OutputFormat, GeneratedArtifacts — generation history.
//! - GenerationRequest, ArtifactName — validated `/generate` and download
//!   inputs.
//! - AccountService, GenerationService, HistoryService — port
//!   implementations wired by the server.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod generation;
pub mod history;
pub mod history_service;
pub mod ports;
pub mod source_structure;
#[cfg(test)]
pub(crate) mod test_clock;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AccessToken, CredentialsValidationError, LoginCredentials, NewAccount, UserIdentity,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::generation::{
    ArtifactName, GenerationRequest, GenerationService, GenerationValidationError,
};
pub(crate) use self::history_service::map_history_repository_error;
pub use self::history::{
    GeneratedArtifacts, HistoryRecord, HistoryRecordId, OutputFormat, UnknownOutputFormat,
};
pub use self::history_service::HistoryService;
pub use self::source_structure::{ExtractionSummary, summarise_file};
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EMAIL_MAX, EmailAddress, PasswordHash, User, UserAccount,
    UserId, UserValidationError,
};
