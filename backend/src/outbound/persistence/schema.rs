//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        display_name -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per successful generation, owned by a user.
    history (id) {
        id -> Uuid,
        user_id -> Uuid,
        file_name -> Text,
        /// `docx`, `pdf` or `pptx`.
        format -> Varchar,
        /// Untagged extraction summary JSON.
        summary -> Jsonb,
        instructions -> Text,
        /// Map of output format to builder locator.
        artifacts -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(history -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(history, users);
