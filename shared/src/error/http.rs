//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::AppointmentNotFound
            | Self::SalesRecordNotFound
            | Self::CustomerNotFound
            | Self::CounselingSheetNotFound
            | Self::StaffNotFound
            | Self::PostNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::SlotConflict | Self::StaffHasAppointments => {
                StatusCode::CONFLICT
            }

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError | Self::FetchFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::AppointmentNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::CounselingSheetNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::SlotConflict.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::StaffHasAppointments.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::InvalidPeriod.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_transient_status() {
        assert_eq!(
            ErrorCode::TimeoutError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::FetchFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
