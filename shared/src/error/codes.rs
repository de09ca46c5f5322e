//! Unified error codes for the salon backend
//!
//! This module defines all error codes shared by the server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Appointment errors
//! - 5xxx: Sales errors
//! - 6xxx: Customer errors
//! - 7xxx: Staff errors
//! - 8xxx: Content errors (Instagram posts)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Appointment ====================
    /// Appointment not found
    AppointmentNotFound = 4001,
    /// Requested interval overlaps an existing booking
    SlotConflict = 4002,
    /// Appointment end is not after its start
    InvalidTimeRange = 4003,
    /// Working hours / slot rules are unusable
    InvalidSlotRules = 4004,

    // ==================== 5xxx: Sales ====================
    /// Sales record not found
    SalesRecordNotFound = 5001,
    /// Reporting period is not day / week / month / year
    InvalidPeriod = 5002,
    /// Amount is negative
    InvalidAmount = 5003,
    /// Payment method is not recognized
    PaymentInvalidMethod = 5004,

    // ==================== 6xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 6001,
    /// Counseling sheet not found
    CounselingSheetNotFound = 6101,

    // ==================== 7xxx: Staff ====================
    /// Staff member not found
    StaffNotFound = 7001,
    /// Staff member still has appointments
    StaffHasAppointments = 7002,

    // ==================== 8xxx: Content ====================
    /// Instagram post not found
    PostNotFound = 8001,
    /// Scheduled post has no scheduled time
    PostScheduleMissing = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Record store could not be read
    FetchFailed = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Appointment
            ErrorCode::AppointmentNotFound => "Appointment not found",
            ErrorCode::SlotConflict => "Selected time slot is already booked",
            ErrorCode::InvalidTimeRange => "End time must be after start time",
            ErrorCode::InvalidSlotRules => "Invalid working hours or slot settings",

            // Sales
            ErrorCode::SalesRecordNotFound => "Sales record not found",
            ErrorCode::InvalidPeriod => "Invalid period",
            ErrorCode::InvalidAmount => "Amount must not be negative",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CounselingSheetNotFound => "Counseling sheet not found",

            // Staff
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::StaffHasAppointments => {
                "Cannot delete staff member with existing appointments"
            }

            // Content
            ErrorCode::PostNotFound => "Post not found",
            ErrorCode::PostScheduleMissing => "Scheduled post requires a scheduled time",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::FetchFailed => "Failed to fetch records",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Appointment
            4001 => Ok(ErrorCode::AppointmentNotFound),
            4002 => Ok(ErrorCode::SlotConflict),
            4003 => Ok(ErrorCode::InvalidTimeRange),
            4004 => Ok(ErrorCode::InvalidSlotRules),

            // Sales
            5001 => Ok(ErrorCode::SalesRecordNotFound),
            5002 => Ok(ErrorCode::InvalidPeriod),
            5003 => Ok(ErrorCode::InvalidAmount),
            5004 => Ok(ErrorCode::PaymentInvalidMethod),

            // Customer
            6001 => Ok(ErrorCode::CustomerNotFound),
            6101 => Ok(ErrorCode::CounselingSheetNotFound),

            // Staff
            7001 => Ok(ErrorCode::StaffNotFound),
            7002 => Ok(ErrorCode::StaffHasAppointments),

            // Content
            8001 => Ok(ErrorCode::PostNotFound),
            8002 => Ok(ErrorCode::PostScheduleMissing),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::FetchFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
