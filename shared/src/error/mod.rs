//! Unified error system for the salon backend
//!
//! This module provides a comprehensive error handling system with:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Appointment errors
//! - 5xxx: Sales errors
//! - 6xxx: Customer errors
//! - 7xxx: Staff errors
//! - 8xxx: Content errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::AppointmentNotFound);
//!
//! // Create an error with details
//! let err = AppError::slot_conflict("Selected time slot is already booked")
//!     .with_detail("staff_id", 3);
//!
//! // Convert to API response
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(4002));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
