//! Document generation use-case.
//!
//! Orchestrates one `/generate` call: summarise the uploaded source, build
//! the builder payload, delegate, and record history on success. Staging and
//! cleanup of the upload itself belong to the inbound adapter.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Value, json};
use tracing::{info, warn};

use super::history::{GeneratedArtifacts, HistoryRecord, HistoryRecordId, OutputFormat};
use super::ports::{
    ArtifactDownload, ArtifactQuery, BuildDocumentPayload, DocumentBuilder, DocumentBuilderError,
    DocumentGeneration, HistoryRepository,
};
use super::source_structure::summarise_file;
use super::user::UserId;
use super::{Error, map_history_repository_error};

/// Validation failures for generation and download inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationValidationError {
    #[error("file and instructions required")]
    MissingInstructions,
    #[error("file and instructions required")]
    MissingFile,
    #[error("file name must be a single path segment")]
    InvalidFileName,
}

/// A validated generation request.
///
/// ## Invariants
/// - `instructions` is non-blank; it is forwarded verbatim, whitespace kept.
/// - `source` is the upload decoded as UTF-8 with invalid sequences replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    user_id: UserId,
    file_name: String,
    source: String,
    instructions: String,
    format: OutputFormat,
}

impl GenerationRequest {
    /// Build a request from the raw upload contents.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{GenerationRequest, OutputFormat, UserId};
    ///
    /// let request = GenerationRequest::try_new(
    ///     UserId::random(),
    ///     "main.py",
    ///     b"def main(): pass",
    ///     "Document this",
    ///     OutputFormat::Pdf,
    /// )
    /// .expect("valid request");
    /// assert_eq!(request.source(), "def main(): pass");
    /// ```
    pub fn try_new(
        user_id: UserId,
        file_name: impl Into<String>,
        contents: &[u8],
        instructions: impl Into<String>,
        format: OutputFormat,
    ) -> Result<Self, GenerationValidationError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(GenerationValidationError::MissingFile);
        }
        let instructions = instructions.into();
        if instructions.trim().is_empty() {
            return Err(GenerationValidationError::MissingInstructions);
        }
        Ok(Self {
            user_id,
            file_name,
            source: String::from_utf8_lossy(contents).into_owned(),
            instructions,
            format,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Original client-side file name.
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    pub fn instructions(&self) -> &str {
        self.instructions.as_str()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Name of a generated artefact on the builder, restricted to one path
/// segment so it cannot address anything outside the builder's output
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Validate a client-supplied artefact name.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ArtifactName;
    ///
    /// assert!(ArtifactName::new("report.docx").is_ok());
    /// assert!(ArtifactName::new("../secrets").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, GenerationValidationError> {
        let raw = raw.into();
        let invalid = raw.trim().is_empty()
            || raw.contains(['/', '\\', '\0'])
            || raw.contains("..");
        if invalid {
            return Err(GenerationValidationError::InvalidFileName);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ArtifactName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Map builder failures onto the shared error payload.
///
/// Upstream failures keep the builder's status and body in `details` so
/// clients can surface what went wrong.
pub(crate) fn map_builder_error(error: DocumentBuilderError) -> Error {
    match error {
        DocumentBuilderError::NotFound { message } => {
            Error::not_found("file not found").with_details(json!({ "body": message }))
        }
        DocumentBuilderError::Status { status, body } => Error::upstream("document builder error")
            .with_details(json!({ "status": status, "body": body })),
        DocumentBuilderError::Timeout { message } => Error::upstream("document builder timed out")
            .with_details(json!({ "status": Value::Null, "body": message })),
        DocumentBuilderError::Transport { message } | DocumentBuilderError::Decode { message } => {
            Error::upstream("generation failed")
                .with_details(json!({ "status": Value::Null, "body": message }))
        }
    }
}

/// Service implementing [`DocumentGeneration`] and [`ArtifactQuery`].
#[derive(Clone)]
pub struct GenerationService {
    builder: Arc<dyn DocumentBuilder>,
    history: Arc<dyn HistoryRepository>,
    clock: Arc<dyn Clock>,
}

impl GenerationService {
    pub fn new(
        builder: Arc<dyn DocumentBuilder>,
        history: Arc<dyn HistoryRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            builder,
            history,
            clock,
        }
    }
}

#[async_trait]
impl DocumentGeneration for GenerationService {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, Error> {
        let summary = summarise_file(request.file_name(), request.source());
        let payload = BuildDocumentPayload::from_instructions(
            request.source(),
            request.instructions(),
            request.format(),
        );

        let response = self
            .builder
            .build_document(&payload)
            .await
            .map_err(|error| {
                warn!(%error, user_id = %request.user_id(), "document builder call failed");
                map_builder_error(error)
            })?;

        let record = HistoryRecord {
            id: HistoryRecordId::random(),
            user_id: *request.user_id(),
            file_name: request.file_name().to_owned(),
            format: request.format(),
            summary,
            instructions: request.instructions().to_owned(),
            artifacts: GeneratedArtifacts::from_builder_response(&response),
            created_at: self.clock.utc(),
        };
        self.history
            .insert(&record)
            .await
            .map_err(map_history_repository_error)?;

        info!(
            user_id = %record.user_id,
            history_id = %record.id,
            format = %record.format,
            artifacts = record.artifacts.iter().count(),
            "document generated"
        );
        Ok(response)
    }
}

#[async_trait]
impl ArtifactQuery for GenerationService {
    async fn fetch_artifact(
        &self,
        format: OutputFormat,
        name: &ArtifactName,
    ) -> Result<ArtifactDownload, Error> {
        self.builder
            .download(format, name.as_ref())
            .await
            .map_err(|error| {
                warn!(%error, %format, file_name = %name, "artefact download failed");
                map_builder_error(error)
            })
    }
}

#[cfg(test)]
#[path = "generation_tests.rs"]
mod tests;
