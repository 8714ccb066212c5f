//! Repository Module
//!
//! Storage operations for the register ledger. Everything is scoped by
//! `business_id`; the state-machine invariants (one open shift per business,
//! append-only movements, write-once closed shifts) live at this layer so
//! they hold across server instances.

pub mod movement;
pub mod sale;
pub mod shift;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err
            && matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
        {
            // Partial unique index on (business_id) WHERE status = 'OPEN':
            // two concurrent opens race past the pre-check, one loses here.
            return RepoError::Conflict(db.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
