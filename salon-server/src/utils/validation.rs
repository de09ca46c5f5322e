//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;
use shared::error::ErrorCode;

// ── Text length limits ──────────────────────────────────────────────

/// Person and service names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, concerns, allergies, preferences
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, role label, birthday
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Image URLs
pub const MAX_URL_LEN: usize = 2048;

/// Instagram caption limit
pub const MAX_CAPTION_LEN: usize = 2200;

/// Upper bound for a single sale (yen)
pub const MAX_AMOUNT: i64 = 100_000_000;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        ));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Validate a yen amount is non-negative and within bounds
pub fn validate_amount(amount: i64, field: &str) -> Result<(), AppError> {
    if !(0..=MAX_AMOUNT).contains(&amount) {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be between 0 and {MAX_AMOUNT}, got {amount}"),
        ));
    }
    Ok(())
}

/// Validate a half-open time interval `[start, end)` is non-empty
pub fn validate_interval(start: i64, end: i64) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::with_message(
            ErrorCode::InvalidTimeRange,
            format!("end_time ({end}) must be after start_time ({start})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text() {
        assert!(validate_required_text("Hanako", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert!(validate_required_text(&"a".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn multibyte_text_counts_chars() {
        // 200 kana fit even though they are 600 bytes
        let name = "あ".repeat(200);
        assert!(validate_required_text(&name, "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn optional_text() {
        assert!(validate_optional_text(&None, "notes", 5).is_ok());
        assert!(validate_optional_text(&Some("abc".into()), "notes", 5).is_ok());
        assert!(validate_optional_text(&Some("abcdef".into()), "notes", 5).is_err());
    }

    #[test]
    fn amounts_and_intervals() {
        assert!(validate_amount(0, "amount").is_ok());
        assert_eq!(
            validate_amount(-1, "amount").unwrap_err().code,
            ErrorCode::InvalidAmount
        );
        assert!(validate_interval(1, 2).is_ok());
        assert_eq!(
            validate_interval(2, 2).unwrap_err().code,
            ErrorCode::InvalidTimeRange
        );
    }
}
