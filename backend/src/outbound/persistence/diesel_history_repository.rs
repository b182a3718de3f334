//! PostgreSQL-backed `HistoryRepository` implementation using Diesel ORM.
//!
//! The summary and artefact map are stored as JSONB in the same shape the
//! API returns them.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{HistoryRepository, HistoryRepositoryError};
use crate::domain::{HistoryRecord, HistoryRecordId, OutputFormat, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{HistoryRow, NewHistoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::history;

/// Diesel-backed implementation of the `HistoryRepository` port.
#[derive(Clone)]
pub struct DieselHistoryRepository {
    pool: DbPool,
}

impl DieselHistoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HistoryRepositoryError {
    map_basic_pool_error(error, HistoryRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> HistoryRepositoryError {
    map_basic_diesel_error(
        error,
        HistoryRepositoryError::query,
        HistoryRepositoryError::connection,
    )
}

fn corrupt_row(id: uuid::Uuid, column: &'static str, detail: String) -> HistoryRepositoryError {
    warn!(history_id = %id, column, %detail, "stored history row failed to decode");
    HistoryRepositoryError::query("stored history row is invalid")
}

fn record_to_row(record: &HistoryRecord) -> Result<NewHistoryRow<'_>, HistoryRepositoryError> {
    let encode = |error: serde_json::Error| {
        HistoryRepositoryError::query(format!("history record could not be encoded: {error}"))
    };
    Ok(NewHistoryRow {
        id: *record.id.as_uuid(),
        user_id: *record.user_id.as_uuid(),
        file_name: record.file_name.as_str(),
        format: record.format.as_str(),
        summary: serde_json::to_value(&record.summary).map_err(encode)?,
        instructions: record.instructions.as_str(),
        artifacts: serde_json::to_value(&record.artifacts).map_err(encode)?,
        created_at: record.created_at,
    })
}

fn row_to_record(row: HistoryRow) -> Result<HistoryRecord, HistoryRepositoryError> {
    let format = row
        .format
        .parse::<OutputFormat>()
        .map_err(|error| corrupt_row(row.id, "format", error.to_string()))?;
    let summary = serde_json::from_value(row.summary)
        .map_err(|error| corrupt_row(row.id, "summary", error.to_string()))?;
    let artifacts = serde_json::from_value(row.artifacts)
        .map_err(|error| corrupt_row(row.id, "artifacts", error.to_string()))?;
    Ok(HistoryRecord {
        id: HistoryRecordId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        file_name: row.file_name,
        format,
        summary,
        instructions: row.instructions,
        artifacts,
        created_at: row.created_at,
    })
}

#[async_trait]
impl HistoryRepository for DieselHistoryRepository {
    async fn insert(&self, record: &HistoryRecord) -> Result<(), HistoryRepositoryError> {
        let row = record_to_row(record)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(history::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HistoryRecord>, HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<HistoryRow> = history::table
            .filter(history::user_id.eq(*user_id.as_uuid()))
            .order((history::created_at.desc(), history::id.desc()))
            .select(HistoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_record).collect()
    }

    async fn delete_for_user(
        &self,
        user_id: &UserId,
        id: &HistoryRecordId,
    ) -> Result<bool, HistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            history::table
                .filter(history::id.eq(*id.as_uuid()))
                .filter(history::user_id.eq(*user_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
