//! History API handlers.
//!
//! ```text
//! GET /history
//! DELETE /history/{id}
//! ```

use actix_web::{delete, get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, ExtractionSummary, GeneratedArtifacts, HistoryRecord, OutputFormat};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::state::HttpState;

/// One generation as returned by `GET /history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItemResponse {
    pub id: Uuid,
    #[schema(example = "main.py")]
    pub file_name: String,
    pub format: OutputFormat,
    pub summary: ExtractionSummary,
    pub instructions: String,
    pub artifacts: GeneratedArtifacts,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryRecord> for HistoryItemResponse {
    fn from(record: HistoryRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            file_name: record.file_name,
            format: record.format,
            summary: record.summary,
            instructions: record.instructions,
            artifacts: record.artifacts,
            created_at: record.created_at,
        }
    }
}

/// Confirmation returned after deleting a record.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "History item deleted")]
    pub message: String,
}

/// List the caller's generations, newest first.
#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "Caller's history", body = [HistoryItemResponse]),
        (status = 401, description = "Missing bearer token", body = Error),
        (status = 403, description = "Invalid bearer token", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["history"],
    operation_id = "listHistory"
)]
#[get("/history")]
pub async fn list_history(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
) -> ApiResult<web::Json<Vec<HistoryItemResponse>>> {
    let records = state
        .history_query
        .list(&caller.identity().user_id)
        .await?;
    Ok(web::Json(records.into_iter().map(Into::into).collect()))
}

/// Delete one of the caller's generations.
///
/// Unknown ids, malformed ids and records owned by someone else all answer
/// `404`.
#[utoipa::path(
    delete,
    path = "/history/{id}",
    params(("id" = String, Path, description = "History record id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 401, description = "Missing bearer token", body = Error),
        (status = 403, description = "Invalid bearer token", body = Error),
        (status = 404, description = "No such record for the caller", body = Error)
    ),
    tags = ["history"],
    operation_id = "deleteHistory"
)]
#[delete("/history/{id}")]
pub async fn delete_history(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = path.into_inner();
    state
        .history_command
        .delete(&caller.identity().user_id, &id)
        .await?;
    Ok(web::Json(MessageResponse {
        message: "History item deleted".to_owned(),
    }))
}
