//! Half-open interval overlap checks
//!
//! Two bookings `[a, b)` and `[c, d)` overlap iff `a < d && c < b`;
//! touching intervals do not. Cancelled appointments never block.

use shared::models::Appointment;

pub fn overlaps(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    a_start < b_end && b_start < a_end
}

/// Non-cancelled appointments intersecting `[start, end)`, ignoring `exclude_id`
pub(crate) fn blocking<'a>(
    existing: &'a [Appointment],
    start: i64,
    end: i64,
    exclude_id: Option<i64>,
) -> impl Iterator<Item = &'a Appointment> {
    existing.iter().filter(move |a| {
        a.status.blocks_slot()
            && Some(a.id) != exclude_id
            && overlaps(a.start_time, a.end_time, start, end)
    })
}

/// Appointments of `staff_id` that `[start, end)` would collide with
pub fn find_conflicts<'a>(
    existing: &'a [Appointment],
    staff_id: i64,
    start: i64,
    end: i64,
    exclude_id: Option<i64>,
) -> Vec<&'a Appointment> {
    blocking(existing, start, end, exclude_id)
        .filter(|a| a.staff_id == staff_id)
        .collect()
}

/// Whether `[start, end)` collides with another booking of `staff_id`
pub fn has_conflict(
    existing: &[Appointment],
    staff_id: i64,
    start: i64,
    end: i64,
    exclude_id: Option<i64>,
) -> bool {
    blocking(existing, start, end, exclude_id).any(|a| a.staff_id == staff_id)
}
