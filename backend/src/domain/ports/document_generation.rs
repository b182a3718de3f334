//! Driving ports for document generation and artefact downloads.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use serde_json::{Value, json};

use crate::domain::{ArtifactName, Error, GenerationRequest, OutputFormat};

use super::document_builder::ArtifactDownload;

/// Domain use-case port for the generate flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentGeneration: Send + Sync {
    /// Summarise the upload, delegate to the builder, record history and
    /// return the builder's JSON body.
    async fn generate(&self, request: GenerationRequest) -> Result<Value, Error>;
}

/// Domain use-case port for fetching generated artefacts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactQuery: Send + Sync {
    /// Open a download stream for one artefact.
    async fn fetch_artifact(
        &self,
        format: OutputFormat,
        name: &ArtifactName,
    ) -> Result<ArtifactDownload, Error>;
}

/// Fixture generation echoing a builder-shaped response.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentGeneration;

#[async_trait]
impl DocumentGeneration for FixtureDocumentGeneration {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, Error> {
        let mut body = json!({ "diagrams_count": 0 });
        body[request.format().as_str()] = Value::String(format!("fixture.{}", request.format()));
        Ok(body)
    }
}

/// Fixture artefact query serving a fixed body for every name.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureArtifactQuery;

/// Body returned by [`FixtureArtifactQuery`].
pub const FIXTURE_ARTIFACT_BODY: &[u8] = b"fixture artefact";

#[async_trait]
impl ArtifactQuery for FixtureArtifactQuery {
    async fn fetch_artifact(
        &self,
        _format: OutputFormat,
        _name: &ArtifactName,
    ) -> Result<ArtifactDownload, Error> {
        Ok(ArtifactDownload {
            content_type: Some("application/octet-stream".to_owned()),
            content_length: Some(FIXTURE_ARTIFACT_BODY.len() as u64),
            body: Box::pin(stream::once(async {
                Ok(Bytes::from_static(FIXTURE_ARTIFACT_BODY))
            })),
        })
    }
}
