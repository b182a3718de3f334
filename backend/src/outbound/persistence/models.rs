//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{history, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the history table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HistoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub format: String,
    pub summary: serde_json::Value,
    pub instructions: String,
    pub artifacts: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for appending history records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = history)]
pub(crate) struct NewHistoryRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: &'a str,
    pub format: &'a str,
    pub summary: serde_json::Value,
    pub instructions: &'a str,
    pub artifacts: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
