//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, ArtifactQuery, DocumentGeneration, FixtureAccountCommand,
    FixtureArtifactQuery, FixtureDocumentGeneration, FixtureHistoryCommand, FixtureHistoryQuery,
    FixtureIdentityVerifier, FixtureUserProfileQuery, HistoryCommand, HistoryQuery,
    IdentityVerifier, UserProfileQuery,
};

/// Default upload size limit: 5 MiB.
pub const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 5 * 1024 * 1024;

/// Where staged uploads are written and how large they may grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub directory: PathBuf,
    pub max_bytes: usize,
}

impl UploadSettings {
    pub fn new(directory: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            directory: directory.into(),
            max_bytes,
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self::new(std::env::temp_dir(), DEFAULT_UPLOAD_LIMIT_BYTES)
    }
}

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub generation: Arc<dyn DocumentGeneration>,
    pub artifacts: Arc<dyn ArtifactQuery>,
    pub history_query: Arc<dyn HistoryQuery>,
    pub history_command: Arc<dyn HistoryCommand>,
}

impl HttpStatePorts {
    /// Ports backed entirely by fixtures; handy for handler tests and demos.
    ///
    /// # Examples
    /// ```
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts, UploadSettings};
    ///
    /// let state = HttpState::new(HttpStatePorts::fixtures(), UploadSettings::default());
    /// let _verifier = state.identity.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self {
            accounts: Arc::new(FixtureAccountCommand),
            identity: Arc::new(FixtureIdentityVerifier),
            profile: Arc::new(FixtureUserProfileQuery),
            generation: Arc::new(FixtureDocumentGeneration),
            artifacts: Arc::new(FixtureArtifactQuery),
            history_query: Arc::new(FixtureHistoryQuery),
            history_command: Arc::new(FixtureHistoryCommand),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub generation: Arc<dyn DocumentGeneration>,
    pub artifacts: Arc<dyn ArtifactQuery>,
    pub history_query: Arc<dyn HistoryQuery>,
    pub history_command: Arc<dyn HistoryCommand>,
    pub uploads: UploadSettings,
}

impl HttpState {
    /// Construct state from a ports bundle and upload settings.
    pub fn new(ports: HttpStatePorts, uploads: UploadSettings) -> Self {
        let HttpStatePorts {
            accounts,
            identity,
            profile,
            generation,
            artifacts,
            history_query,
            history_command,
        } = ports;
        Self {
            accounts,
            identity,
            profile,
            generation,
            artifacts,
            history_query,
            history_command,
            uploads,
        }
    }
}
