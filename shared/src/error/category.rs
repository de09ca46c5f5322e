//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 4xxx: Appointment errors
/// - 5xxx: Sales errors
/// - 6xxx: Customer errors
/// - 7xxx: Staff errors
/// - 8xxx: Content errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Appointment errors (4xxx)
    Appointment,
    /// Sales errors (5xxx)
    Sales,
    /// Customer errors (6xxx)
    Customer,
    /// Staff errors (7xxx)
    Staff,
    /// Content errors (8xxx)
    Content,
    /// System errors (9xxx, and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            4000..5000 => Self::Appointment,
            5000..6000 => Self::Sales,
            6000..7000 => Self::Customer,
            7000..8000 => Self::Staff,
            8000..9000 => Self::Content,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Appointment => "appointment",
            Self::Sales => "sales",
            Self::Customer => "customer",
            Self::Staff => "staff",
            Self::Content => "content",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Appointment);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Sales);
        assert_eq!(ErrorCategory::from_code(6101), ErrorCategory::Customer);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Staff);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::Content);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::SlotConflict.category(), ErrorCategory::Appointment);
        assert_eq!(ErrorCode::InvalidPeriod.category(), ErrorCategory::Sales);
        assert_eq!(ErrorCode::CustomerNotFound.category(), ErrorCategory::Customer);
        assert_eq!(ErrorCode::StaffNotFound.category(), ErrorCategory::Staff);
        assert_eq!(ErrorCode::PostNotFound.category(), ErrorCategory::Content);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_name() {
        assert_eq!(ErrorCategory::General.name(), "general");
        assert_eq!(ErrorCategory::Appointment.name(), "appointment");
        assert_eq!(ErrorCategory::System.name(), "system");
    }
}
