//! Time helpers - business timezone conversions
//!
//! Date -> timestamp conversion happens at the API / service layer;
//! repositories only ever see `i64` Unix millis.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Parse a wall-clock time (HH:MM), falling back to `default` with a warning
pub fn parse_hhmm_or(value: &str, default: NaiveTime) -> NaiveTime {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse time '{}': {}, falling back to {}",
            value,
            e,
            default.format("%H:%M")
        );
        default
    })
}

/// Local date-time -> Unix millis (business timezone)
///
/// DST gap fallback: if the local time does not exist, fall back to UTC.
pub fn local_to_millis(naive: NaiveDateTime, tz: Tz) -> i64 {
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Date + wall-clock time -> Unix millis (business timezone)
pub fn date_time_to_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    local_to_millis(date.and_time(time), tz)
}

/// Start of day (00:00:00) -> Unix millis (business timezone)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_time_to_millis(date, NaiveTime::MIN, tz)
}

/// End of day -> next day's 00:00:00 in Unix millis (business timezone)
///
/// Callers use `< end` (exclusive) semantics.
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_time_to_millis(next_day, NaiveTime::MIN, tz)
}

/// Today's date in the business timezone
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the following month
pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(date)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let start = month_start(date);
    next_month_start(date).signed_duration_since(start).num_days() as u32
}
