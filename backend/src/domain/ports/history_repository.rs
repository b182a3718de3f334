//! Driven port for storing generation history.

use async_trait::async_trait;

use crate::domain::{HistoryRecord, HistoryRecordId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by history repository adapters.
    pub enum HistoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "history repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "history repository query failed: {message}",
    }
}

/// Append-only store of history records, always filtered by owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, record: &HistoryRecord) -> Result<(), HistoryRepositoryError>;

    /// Records owned by `user_id`, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HistoryRecord>, HistoryRepositoryError>;

    /// Remove a record owned by `user_id`. Returns `false` when no such record
    /// belongs to the caller.
    async fn delete_for_user(
        &self,
        user_id: &UserId,
        id: &HistoryRecordId,
    ) -> Result<bool, HistoryRepositoryError>;
}
