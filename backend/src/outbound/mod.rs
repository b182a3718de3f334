//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: mutex-guarded in-process repositories for database-less runs
//! - **builder**: reqwest client for the external document builder
//! - **security**: Argon2id password hashing and HS256 bearer tokens
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod builder;
pub mod memory;
pub mod persistence;
pub mod security;
