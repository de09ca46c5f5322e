//! Core service errors
//!
//! Returned by the scheduling and reporting services and converted to
//! [`AppError`] at the HTTP boundary.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::FetchError;
use crate::db::repository::RepoError;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed date, unknown period, zero step/duration, empty working hours
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The store could not deliver the records needed for the computation
    #[error("Failed to fetch {what}: {source}")]
    FetchFailure {
        what: &'static str,
        #[source]
        source: FetchError,
    },

    /// The requested interval overlaps existing bookings
    #[error("Slot conflict for staff {staff_id}: overlaps {conflicting:?}")]
    SlotConflict {
        staff_id: i64,
        conflicting: Vec<i64>,
    },

    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn fetch(what: &'static str) -> impl FnOnce(FetchError) -> Self {
        move |source| Self::FetchFailure { what, source }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidArgument(_) => AppError::with_message(ErrorCode::InvalidRequest, message),
            CoreError::FetchFailure { what, source } => match source {
                FetchError::Timeout(ms) => AppError::with_message(ErrorCode::TimeoutError, message)
                    .with_detail("what", what)
                    .with_detail("timeout_ms", ms),
                FetchError::Store(RepoError::Conflict(_)) => AppError::slot_conflict(message),
                FetchError::Store(RepoError::NotFound(_)) => {
                    AppError::with_message(ErrorCode::NotFound, message)
                }
                FetchError::Store(RepoError::Validation(_)) => AppError::validation(message),
                FetchError::Store(_) => {
                    AppError::with_message(ErrorCode::FetchFailed, message).with_detail("what", what)
                }
            },
            CoreError::SlotConflict {
                staff_id,
                conflicting,
            } => AppError::slot_conflict(message)
                .with_detail("staff_id", staff_id)
                .with_detail("conflicting_ids", conflicting),
            CoreError::NotFound(_) => AppError::with_message(ErrorCode::NotFound, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn status_mapping() {
        let e: AppError = CoreError::invalid("bad period").into();
        assert_eq!(e.http_status(), StatusCode::BAD_REQUEST);

        let e: AppError = CoreError::SlotConflict {
            staff_id: 7,
            conflicting: vec![1, 2],
        }
        .into();
        assert_eq!(e.code, ErrorCode::SlotConflict);
        assert_eq!(e.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            e.details.unwrap()["conflicting_ids"],
            serde_json::json!([1, 2])
        );

        let e: AppError = CoreError::fetch("sales")(FetchError::Timeout(500)).into();
        assert_eq!(e.code, ErrorCode::TimeoutError);
        assert_eq!(e.http_status(), StatusCode::SERVICE_UNAVAILABLE);

        let e: AppError =
            CoreError::fetch("sales")(FetchError::Store(RepoError::Database("x".into()))).into();
        assert_eq!(e.code, ErrorCode::FetchFailed);
        assert_eq!(e.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
