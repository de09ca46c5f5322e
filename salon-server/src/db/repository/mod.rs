//! Repository Module
//!
//! CRUD operations over the SQLite tables, one module per collection.
//! Every function is a free async fn taking `&SqlitePool`.

pub mod appointment;
pub mod counseling_sheet;
pub mod customer;
pub mod instagram_post;
pub mod sales_goals;
pub mod sales_record;
pub mod staff;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Overlapping booking detected while writing
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                return RepoError::Validation(db_err.message().to_string());
            }
        }
        if matches!(err, sqlx::Error::RowNotFound) {
            return RepoError::NotFound("row".into());
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Conflict(msg) => AppError::slot_conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Escape `%`, `_` and `\` for use inside a `LIKE ... ESCAPE '\'` pattern
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
