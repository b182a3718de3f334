//! Reqwest-backed document builder adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, JSON decoding, and streaming artefact bodies.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::{Client, StatusCode, Url, header};
use serde_json::Value;
use tracing::debug;

use super::dto::BuildDocumentRequestDto;
use crate::domain::OutputFormat;
use crate::domain::ports::{
    ArtifactDownload, BuildDocumentPayload, DocumentBuilder, DocumentBuilderError,
};

/// Document builder adapter talking to one base URL.
pub struct HttpDocumentBuilder {
    client: Client,
    base_url: Url,
    build_timeout: Duration,
}

impl HttpDocumentBuilder {
    /// Build an adapter for `base_url`.
    ///
    /// `timeout` bounds each `/build-document` call, response body included,
    /// and connection setup for downloads. Artefact streams are not cut off
    /// once they start.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().connect_timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            build_timeout: timeout,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DocumentBuilderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                DocumentBuilderError::transport(format!(
                    "builder base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl DocumentBuilder for HttpDocumentBuilder {
    async fn build_document(
        &self,
        payload: &BuildDocumentPayload,
    ) -> Result<Value, DocumentBuilderError> {
        let url = self.endpoint(&["build-document"])?;
        debug!(%url, format = %payload.format, "calling document builder");
        let response = self
            .client
            .post(url)
            .timeout(self.build_timeout)
            .header(header::ACCEPT, "application/json")
            .json(&BuildDocumentRequestDto::from(payload))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_build_response(body.as_ref())
    }

    async fn download(
        &self,
        format: OutputFormat,
        file_name: &str,
    ) -> Result<ArtifactDownload, DocumentBuilderError> {
        let url = self.endpoint(&["download", format.as_str(), file_name])?;
        debug!(%url, "proxying artefact download");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_transport_error)?;
            return Err(map_status_error(status, body.as_ref()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let content_length = response.content_length();
        let body = response.bytes_stream().map_err(map_transport_error);
        Ok(ArtifactDownload {
            content_type,
            content_length,
            body: Box::pin(body),
        })
    }
}

fn parse_build_response(body: &[u8]) -> Result<Value, DocumentBuilderError> {
    serde_json::from_slice(body).map_err(|error| {
        DocumentBuilderError::decode(format!("invalid builder JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> DocumentBuilderError {
    if error.is_timeout() {
        DocumentBuilderError::timeout(error.to_string())
    } else {
        DocumentBuilderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DocumentBuilderError {
    let body_preview = body_preview(body);
    match status {
        StatusCode::NOT_FOUND => DocumentBuilderError::not_found(body_preview),
        _ => DocumentBuilderError::status(status.as_u16(), body_preview),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
