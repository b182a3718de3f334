//! Driven port for the external document builder.
//!
//! The builder performs the AI-assisted writing, UML rendering and export. The
//! domain only owns the request shape and the two calls it relies on.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use serde_json::Value;

use crate::domain::OutputFormat;

use super::define_port_error;

/// Delegation payload sent to `POST /build-document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDocumentPayload {
    pub code: String,
    pub instructions: String,
    pub format: OutputFormat,
    pub abstract_text: String,
    pub project_info: String,
    pub uml_instructions: String,
}

impl BuildDocumentPayload {
    /// Build the payload from a single instructions string.
    ///
    /// The builder reads `abstract`, `project_info` and `uml_instructions`
    /// as separate inputs; callers provide one free-text field, so the same
    /// text is repeated verbatim in all three.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::OutputFormat;
    /// use backend::domain::ports::BuildDocumentPayload;
    ///
    /// let payload = BuildDocumentPayload::from_instructions("x = 1", "Explain", OutputFormat::Pdf);
    /// assert_eq!(payload.abstract_text, "Explain");
    /// assert_eq!(payload.uml_instructions, payload.instructions);
    /// ```
    pub fn from_instructions(
        code: impl Into<String>,
        instructions: impl Into<String>,
        format: OutputFormat,
    ) -> Self {
        let instructions = instructions.into();
        Self {
            code: code.into(),
            abstract_text: instructions.clone(),
            project_info: instructions.clone(),
            uml_instructions: instructions.clone(),
            instructions,
            format,
        }
    }
}

/// Byte stream of a downloaded artefact.
pub type ArtifactStream = Pin<Box<dyn Stream<Item = Result<Bytes, DocumentBuilderError>> + Send>>;

/// A generated artefact being streamed back from the builder.
pub struct ArtifactDownload {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: ArtifactStream,
}

impl std::fmt::Debug for ArtifactDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactDownload")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

define_port_error! {
    /// Errors surfaced while calling the document builder.
    pub enum DocumentBuilderError {
        /// Network transport failed before a response arrived.
        Transport { message: String } => "document builder transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } => "document builder timed out: {message}",
        /// The builder answered with a non-success status.
        Status { status: u16, body: String } => "document builder returned status {status}",
        /// The requested artefact does not exist.
        NotFound { message: String } => "document builder has no such file: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "document builder response decode failed: {message}",
    }
}

/// Port for the external document builder service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentBuilder: Send + Sync {
    /// Submit a build request and return the builder's JSON body unchanged.
    async fn build_document(
        &self,
        payload: &BuildDocumentPayload,
    ) -> Result<Value, DocumentBuilderError>;

    /// Open a streamed download of a generated artefact.
    async fn download(
        &self,
        format: OutputFormat,
        file_name: &str,
    ) -> Result<ArtifactDownload, DocumentBuilderError>;
}
