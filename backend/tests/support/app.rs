//! Shared wiring for end-to-end HTTP tests: real services over in-memory
//! stores, with a recording double standing in for the document builder.

use std::path::Path;
use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use mockable::DefaultClock;
use serde_json::{Value, json};

use backend::Trace;
use backend::domain::ports::{
    ArtifactDownload, BuildDocumentPayload, DocumentBuilder, DocumentBuilderError,
};
use backend::domain::{AccountService, GenerationService, HistoryService, OutputFormat};
use backend::inbound::http::configure;
use backend::inbound::http::state::{HttpState, HttpStatePorts, UploadSettings};
use backend::outbound::memory::{InMemoryHistoryRepository, InMemoryUserRepository};
use backend::outbound::security::{Argon2CredentialHasher, JwtAccessTokens};

pub const ARTIFACT_BYTES: &[u8] = b"%PDF-1.7 generated";
const MULTIPART_BOUNDARY: &str = "gendoc-integration-boundary";

/// Document builder double that remembers every payload it receives and
/// serves one artefact per format named `report.<format>`.
#[derive(Default)]
pub struct RecordingBuilder {
    payloads: Mutex<Vec<BuildDocumentPayload>>,
}

impl RecordingBuilder {
    pub fn payloads(&self) -> Vec<BuildDocumentPayload> {
        self.payloads
            .lock()
            .map(|payloads| payloads.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentBuilder for RecordingBuilder {
    async fn build_document(
        &self,
        payload: &BuildDocumentPayload,
    ) -> Result<Value, DocumentBuilderError> {
        if let Ok(mut payloads) = self.payloads.lock() {
            payloads.push(payload.clone());
        }
        let format = payload.format.as_str();
        Ok(json!({
            format: format!("report.{format}"),
            "diagrams_count": 1,
        }))
    }

    async fn download(
        &self,
        format: OutputFormat,
        file_name: &str,
    ) -> Result<ArtifactDownload, DocumentBuilderError> {
        if file_name != format!("report.{}", format.as_str()) {
            return Err(DocumentBuilderError::NotFound {
                message: file_name.to_owned(),
            });
        }
        Ok(ArtifactDownload {
            content_type: Some("application/pdf".to_owned()),
            content_length: Some(ARTIFACT_BYTES.len() as u64),
            body: Box::pin(stream::iter(vec![Ok(Bytes::from_static(ARTIFACT_BYTES))])),
        })
    }
}

/// Real services wired the way the server wires them, minus PostgreSQL.
pub fn http_state(builder: Arc<RecordingBuilder>, upload_dir: &Path) -> web::Data<HttpState> {
    let users = Arc::new(InMemoryUserRepository::new());
    let history = Arc::new(InMemoryHistoryRepository::new());
    let clock = Arc::new(DefaultClock);

    let accounts = Arc::new(AccountService::new(
        users,
        Arc::new(Argon2CredentialHasher),
        Arc::new(JwtAccessTokens::new(&[7_u8; 32])),
        clock.clone(),
    ));
    let generation = Arc::new(GenerationService::new(builder, history.clone(), clock));
    let history_service = Arc::new(HistoryService::new(history));

    web::Data::new(HttpState::new(
        HttpStatePorts {
            accounts: accounts.clone(),
            identity: accounts.clone(),
            profile: accounts,
            generation: generation.clone(),
            artifacts: generation,
            history_query: history_service.clone(),
            history_command: history_service,
        },
        UploadSettings::new(upload_dir, 64 * 1024),
    ))
}

pub async fn init_app(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(App::new().app_data(state).wrap(Trace).configure(configure)).await
}

/// One part of a `multipart/form-data` body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

/// Encode `parts`; returns the `Content-Type` value and the payload.
pub fn multipart(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, contents) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(contents);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        body,
    )
}
