//! Scheduling - appointment availability and overlap checks
//!
//! # Structure
//!
//! - [`availability`] - candidate slot enumeration and filtering (pure)
//! - [`conflict`] - half-open interval overlap checks (pure)
//! - [`service`] - store-backed operations used by the HTTP handlers

pub mod availability;
pub mod conflict;
pub mod service;

pub use availability::compute_available_slots;
pub use conflict::{find_conflicts, has_conflict};
pub use service::Scheduler;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;

use crate::error::{CoreError, CoreResult};

/// Daily opening hours (business timezone wall clock)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl BusinessHours {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.close <= self.open {
            return Err(CoreError::invalid(format!(
                "closing time {} must be after opening time {}",
                self.close.format("%H:%M"),
                self.open.format("%H:%M")
            )));
        }
        Ok(())
    }
}

impl Default for BusinessHours {
    /// 09:00 - 19:00
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// What to do with slots that start before closing but end after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosingPolicy {
    /// Offer every start before closing, even if the slot runs past it
    #[default]
    AllowOverrun,
    /// Only offer slots that end at or before closing
    WithinHours,
}

impl FromStr for ClosingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow_overrun" | "overrun" => Ok(Self::AllowOverrun),
            "within_hours" | "strict" => Ok(Self::WithinHours),
            other => Err(format!("unknown closing policy: {other}")),
        }
    }
}

impl fmt::Display for ClosingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllowOverrun => f.write_str("allow_overrun"),
            Self::WithinHours => f.write_str("within_hours"),
        }
    }
}

/// Slot generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRules {
    /// Length of an offered slot
    pub duration_minutes: u32,
    /// Distance between consecutive candidate starts
    pub step_minutes: u32,
    pub closing_policy: ClosingPolicy,
}

impl SlotRules {
    pub fn validate(&self) -> CoreResult<()> {
        if self.duration_minutes == 0 {
            return Err(CoreError::invalid("slot duration must be positive"));
        }
        if self.step_minutes == 0 {
            return Err(CoreError::invalid("slot step must be positive"));
        }
        Ok(())
    }
}

impl Default for SlotRules {
    /// 60-minute slots every 30 minutes
    fn default() -> Self {
        Self {
            duration_minutes: 60,
            step_minutes: 30,
            closing_policy: ClosingPolicy::AllowOverrun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let hours = BusinessHours::default();
        assert_eq!(hours.open.format("%H:%M").to_string(), "09:00");
        assert_eq!(hours.close.format("%H:%M").to_string(), "19:00");
        assert!(hours.validate().is_ok());
        assert!(SlotRules::default().validate().is_ok());
    }

    #[test]
    fn invalid_rules() {
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        assert!(BusinessHours::new(t(10), t(10)).validate().is_err());
        assert!(BusinessHours::new(t(18), t(9)).validate().is_err());
        let rules = SlotRules {
            step_minutes: 0,
            ..SlotRules::default()
        };
        assert!(matches!(rules.validate(), Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn closing_policy_parse() {
        assert_eq!("within_hours".parse::<ClosingPolicy>(), Ok(ClosingPolicy::WithinHours));
        assert_eq!("ALLOW_OVERRUN".parse::<ClosingPolicy>(), Ok(ClosingPolicy::AllowOverrun));
        assert!("sometimes".parse::<ClosingPolicy>().is_err());
    }
}
