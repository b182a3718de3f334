//! Artefact download proxy.
//!
//! ```text
//! GET /download/{filetype}/{filename}
//! ```

use actix_web::body::SizedStream;
use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};
use serde_json::json;

use crate::domain::{ArtifactName, Error, OutputFormat, UnknownOutputFormat};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::state::HttpState;

fn parse_target(filetype: &str, filename: String) -> Result<(OutputFormat, ArtifactName), Error> {
    let format = filetype.parse().map_err(|err: UnknownOutputFormat| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "filetype" }))
    })?;
    let name = ArtifactName::new(filename).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "filename" }))
    })?;
    Ok((format, name))
}

/// Stream a generated artefact from the document builder.
#[utoipa::path(
    get,
    path = "/download/{filetype}/{filename}",
    params(
        ("filetype" = OutputFormat, Path, description = "Artefact format"),
        ("filename" = String, Path, description = "Artefact name as returned by /generate")
    ),
    responses(
        (status = 200, description = "Artefact bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid format or file name", body = Error),
        (status = 401, description = "Missing bearer token", body = Error),
        (status = 403, description = "Invalid bearer token", body = Error),
        (status = 404, description = "Builder has no such file", body = Error),
        (status = 500, description = "Builder failure", body = Error)
    ),
    tags = ["generation"],
    operation_id = "downloadArtifact"
)]
#[get("/download/{filetype}/{filename}")]
pub async fn download(
    state: web::Data<HttpState>,
    _caller: BearerIdentity,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (filetype, filename) = path.into_inner();
    let (format, name) = parse_target(&filetype, filename)?;
    let artifact = state.artifacts.fetch_artifact(format, &name).await?;

    let mut response = HttpResponse::Ok();
    response.insert_header(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(name.to_string())],
    });
    if let Some(content_type) = artifact.content_type.as_deref() {
        response.insert_header((header::CONTENT_TYPE, content_type));
    }
    Ok(match artifact.content_length {
        Some(length) => response.body(SizedStream::new(length, artifact.body)),
        None => response.streaming(artifact.body),
    })
}
