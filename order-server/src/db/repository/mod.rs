//! Repository Module
//!
//! SQL access per aggregate. All queries are runtime-bound
//! (`sqlx::query_as` + `bind`), so builds need no live database.

pub mod event;
pub mod menu;
pub mod order;
pub mod session;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
