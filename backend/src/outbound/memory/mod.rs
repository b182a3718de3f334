//! In-process repository adapters.
//!
//! Used when no database URL is configured and by the integration suite.
//! State lives behind a mutex and is lost on restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    HistoryRepository, HistoryRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{EmailAddress, HistoryRecord, HistoryRecordId, User, UserAccount, UserId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned store is still structurally valid; every mutation is a
    // single insert or remove.
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// In-memory user store keyed by id with an e-mail index.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<UserState>,
}

#[derive(Debug, Default)]
struct UserState {
    by_id: HashMap<UserId, UserAccount>,
    by_email: HashMap<String, UserId>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut state = lock(&self.state);
        let email = account.user.email().as_ref().to_owned();
        if state.by_email.contains_key(&email) {
            return Err(UserPersistenceError::duplicate_email(email));
        }
        let id = *account.user.id();
        state.by_email.insert(email, id);
        state.by_id.insert(id, account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let state = lock(&self.state);
        Ok(state
            .by_email
            .get(email.as_ref())
            .and_then(|id| state.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = lock(&self.state);
        Ok(state.by_id.get(id).map(|account| account.user.clone()))
    }
}

/// In-memory history store in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryHistoryRepository {
    records: Mutex<Vec<HistoryRecord>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn insert(&self, record: &HistoryRecord) -> Result<(), HistoryRepositoryError> {
        lock(&self.records).push(record.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HistoryRecord>, HistoryRepositoryError> {
        let records = lock(&self.records);
        let mut owned: Vec<HistoryRecord> = records
            .iter()
            .filter(|record| &record.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps later inserts first among equal timestamps.
        owned.reverse();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn delete_for_user(
        &self,
        user_id: &UserId,
        id: &HistoryRecordId,
    ) -> Result<bool, HistoryRepositoryError> {
        let mut records = lock(&self.records);
        let before = records.len();
        records.retain(|record| !(&record.id == id && &record.user_id == user_id));
        Ok(records.len() != before)
    }
}
