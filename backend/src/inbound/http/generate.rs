//! Document generation handler.
//!
//! ```text
//! POST /generate  (multipart: inputFile, instructions, format?)
//! ```
//!
//! The upload is staged on disk for the duration of the request and removed
//! when the handler returns, whatever the outcome.

use actix_multipart::Multipart;
use actix_web::{post, web};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::{Error, GenerationRequest, OutputFormat};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::state::{HttpState, UploadSettings};
use crate::inbound::http::upload::StagedUpload;

const TEXT_FIELD_LIMIT_BYTES: usize = 64 * 1024;

/// Multipart body accepted by `POST /generate`.
#[derive(utoipa::ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct GenerateUpload {
    /// Source file to document; `file` is accepted as an alias.
    #[schema(rename = "inputFile", value_type = String, format = Binary)]
    input_file: Vec<u8>,
    /// Free-form instructions forwarded to the builder.
    instructions: String,
    /// One of `docx`, `pdf` or `pptx`; defaults to `docx`.
    format: Option<String>,
}

#[derive(Debug, Default)]
struct GenerateForm {
    upload: Option<StagedUpload>,
    instructions: Option<String>,
    format: Option<String>,
}

fn malformed(err: impl std::fmt::Display) -> Error {
    debug!(error = %err, "malformed multipart request");
    Error::invalid_request("malformed multipart upload")
}

async fn read_text<S, E>(chunks: S, field: &'static str) -> Result<String, Error>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut chunks = std::pin::pin!(chunks);
    let mut buf = Vec::new();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(malformed)?;
        if buf.len() + chunk.len() > TEXT_FIELD_LIMIT_BYTES {
            return Err(Error::invalid_request(format!("{field} is too large"))
                .with_details(json!({ "field": field })));
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf).map_err(|_| {
        Error::invalid_request(format!("{field} must be valid UTF-8"))
            .with_details(json!({ "field": field }))
    })
}

async fn discard<S, E>(chunks: S) -> Result<(), Error>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut chunks = std::pin::pin!(chunks);
    while let Some(chunk) = chunks.next().await {
        chunk.map_err(malformed)?;
    }
    Ok(())
}

async fn read_form(mut payload: Multipart, uploads: &UploadSettings) -> Result<GenerateForm, Error> {
    let mut form = GenerateForm::default();
    while let Some(field) = payload.next().await {
        let field = field.map_err(malformed)?;
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "inputFile" | "file" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_owned);
                let Some(file_name) = file_name else {
                    discard(field).await?;
                    continue;
                };
                if form.upload.is_some() {
                    return Err(Error::invalid_request("only one file may be uploaded")
                        .with_details(json!({ "field": name })));
                }
                let staged =
                    StagedUpload::stage(&uploads.directory, &file_name, field, uploads.max_bytes)
                        .await?;
                form.upload = Some(staged);
            }
            "instructions" => form.instructions = Some(read_text(field, "instructions").await?),
            "format" => form.format = Some(read_text(field, "format").await?),
            _ => discard(field).await?,
        }
    }
    Ok(form)
}

fn parse_format(raw: Option<&str>) -> Result<OutputFormat, Error> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.parse().map_err(|err: crate::domain::UnknownOutputFormat| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "format" }))
        }),
        None => Ok(OutputFormat::default()),
    }
}

/// Summarise an uploaded source file and generate documentation for it.
///
/// Responds with the builder's JSON body unchanged.
#[utoipa::path(
    post,
    path = "/generate",
    request_body(content = GenerateUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Builder response", body = Object),
        (status = 400, description = "Missing file or instructions, or bad format", body = Error),
        (status = 401, description = "Missing bearer token", body = Error),
        (status = 403, description = "Invalid bearer token", body = Error),
        (status = 500, description = "Builder or persistence failure", body = Error)
    ),
    tags = ["generation"],
    operation_id = "generate"
)]
#[post("/generate")]
pub async fn generate(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    payload: Multipart,
) -> ApiResult<web::Json<Value>> {
    let form = read_form(payload, &state.uploads).await?;
    let contents = match &form.upload {
        Some(upload) => upload.read().await?,
        None => Vec::new(),
    };
    let file_name = form
        .upload
        .as_ref()
        .map_or("", StagedUpload::original_name);
    let instructions = form.instructions.clone().unwrap_or_default();
    let format = parse_format(form.format.as_deref())?;

    let request = GenerationRequest::try_new(
        caller.identity().user_id,
        file_name,
        &contents,
        instructions,
        format,
    )
    .map_err(|err| Error::invalid_request(err.to_string()))?;

    let body = state.generation.generate(request).await?;
    Ok(web::Json(body))
}
