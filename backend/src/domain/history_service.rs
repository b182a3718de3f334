//! History listing and deletion scoped to the calling user.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::ports::{HistoryCommand, HistoryQuery, HistoryRepository, HistoryRepositoryError};
use super::{Error, HistoryRecord, HistoryRecordId, UserId};

const HISTORY_NOT_FOUND: &str = "history item not found";

pub(crate) fn map_history_repository_error(error: HistoryRepositoryError) -> Error {
    match error {
        HistoryRepositoryError::Connection { message } => Error::service_unavailable(message),
        HistoryRepositoryError::Query { message } => Error::internal(message),
    }
}

/// Service implementing [`HistoryQuery`] and [`HistoryCommand`].
#[derive(Clone)]
pub struct HistoryService {
    repository: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    pub fn new(repository: Arc<dyn HistoryRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl HistoryQuery for HistoryService {
    async fn list(&self, user_id: &UserId) -> Result<Vec<HistoryRecord>, Error> {
        self.repository
            .list_for_user(user_id)
            .await
            .map_err(map_history_repository_error)
    }
}

#[async_trait]
impl HistoryCommand for HistoryService {
    async fn delete(&self, user_id: &UserId, record_id: &str) -> Result<(), Error> {
        let Some(id) = HistoryRecordId::parse(record_id) else {
            debug!(%user_id, record_id, "rejected malformed history id");
            return Err(Error::not_found(HISTORY_NOT_FOUND));
        };
        let deleted = self
            .repository
            .delete_for_user(user_id, &id)
            .await
            .map_err(map_history_repository_error)?;
        if !deleted {
            return Err(Error::not_found(HISTORY_NOT_FOUND));
        }
        info!(%user_id, history_id = %id, "history item deleted");
        Ok(())
    }
}
