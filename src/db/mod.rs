//! Database module: the credential store backed by SQLite.
//!
//! Layout:
//! - `models.rs`: row struct for the `users` table
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: connection setup and queries

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::DbCredential;
pub use schema::SQLITE_INIT;
pub use sqlite::{CredentialStore, SqlitePool};
