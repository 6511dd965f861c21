//! credgate persistence layer
//!
//! This crate owns the user record store. The rest of the system talks to it
//! through the [`CredentialStore`] trait; [`Database`] persists records in
//! SQLite via sqlx and [`MemoryStore`] keeps them in process memory.

pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;
pub mod utils;

pub use error::DbError;
pub use memory::MemoryStore;
pub use models::*;
pub use repository::Database;
pub use store::CredentialStore;

/// Re-export sqlx types for convenience
pub use sqlx::Error as SqlxError;
