//! Driving ports for reading and deleting the caller's history.

use async_trait::async_trait;

use crate::domain::{Error, HistoryRecord, UserId};

/// Domain use-case port for listing history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryQuery: Send + Sync {
    /// Records owned by the caller, newest first.
    async fn list(&self, user_id: &UserId) -> Result<Vec<HistoryRecord>, Error>;
}

/// Domain use-case port for deleting history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryCommand: Send + Sync {
    /// Delete one of the caller's records. Malformed ids and records owned by
    /// someone else are both reported as not found.
    async fn delete(&self, user_id: &UserId, record_id: &str) -> Result<(), Error>;
}

/// Fixture history with no records.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHistoryQuery;

#[async_trait]
impl HistoryQuery for FixtureHistoryQuery {
    async fn list(&self, _user_id: &UserId) -> Result<Vec<HistoryRecord>, Error> {
        Ok(Vec::new())
    }
}

/// Fixture history command that finds nothing to delete.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHistoryCommand;

#[async_trait]
impl HistoryCommand for FixtureHistoryCommand {
    async fn delete(&self, _user_id: &UserId, _record_id: &str) -> Result<(), Error> {
        Err(Error::not_found("history item not found"))
    }
}
