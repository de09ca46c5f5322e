//! Appointment Model (予約)

use serde::{Deserialize, Serialize};

/// Appointment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Whether the appointment still occupies its staff member's time.
    ///
    /// Only cancelled bookings release the slot.
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Appointment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Appointment {
    pub id: i64,
    pub staff_id: i64,
    pub customer_id: i64,
    /// Start (Unix millis, inclusive)
    pub start_time: i64,
    /// End (Unix millis, exclusive)
    pub end_time: i64,
    pub service_type: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (joined on read) --
    #[cfg_attr(feature = "db", sqlx(default))]
    pub customer_name: Option<String>,
    #[cfg_attr(feature = "db", sqlx(default))]
    pub staff_name: Option<String>,
}

/// Create appointment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub staff_id: i64,
    pub customer_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub service_type: String,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

/// Update appointment payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    pub staff_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub service_type: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl AppointmentUpdate {
    /// Whether applying this update can move the booking in time or to another staff member
    pub fn reschedules(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some() || self.staff_id.is_some()
    }
}

/// Candidate booking slot, derived during availability computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot start (Unix millis)
    pub start: i64,
    /// Slot end (Unix millis, exclusive)
    pub end: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cancelled_releases_slot() {
        assert!(AppointmentStatus::Scheduled.blocks_slot());
        assert!(AppointmentStatus::Confirmed.blocks_slot());
        assert!(AppointmentStatus::Completed.blocks_slot());
        assert!(AppointmentStatus::NoShow.blocks_slot());
        assert!(!AppointmentStatus::Cancelled.blocks_slot());
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::NoShow).unwrap(),
            "\"NO_SHOW\""
        );
        let s: AppointmentStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(s, AppointmentStatus::Cancelled);
    }

    #[test]
    fn update_reschedule_detection() {
        assert!(!AppointmentUpdate::default().reschedules());
        let notes_only = AppointmentUpdate {
            notes: Some("walk-in".into()),
            ..Default::default()
        };
        assert!(!notes_only.reschedules());
        let moved = AppointmentUpdate {
            end_time: Some(1),
            ..Default::default()
        };
        assert!(moved.reschedules());
    }
}
