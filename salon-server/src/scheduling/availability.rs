//! Availability calculator
//!
//! Enumerates candidate slots across the business day and drops every
//! slot that intersects a non-cancelled booking.

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use shared::models::{Appointment, TimeSlot};

use super::conflict::blocking;
use super::{BusinessHours, ClosingPolicy, SlotRules};
use crate::error::CoreResult;
use crate::utils::time::local_to_millis;

const MINUTE_MS: i64 = 60_000;

/// Candidate slots for `date`, ascending by start
///
/// Starts run from opening time in `step_minutes` increments while the
/// start is before closing time.
pub fn candidate_slots(
    date: NaiveDate,
    hours: &BusinessHours,
    rules: &SlotRules,
    tz: Tz,
) -> CoreResult<Vec<TimeSlot>> {
    hours.validate()?;
    rules.validate()?;

    let open = date.and_time(hours.open);
    let close = date.and_time(hours.close);
    let duration = Duration::minutes(rules.duration_minutes as i64);
    let step = Duration::minutes(rules.step_minutes as i64);

    let mut slots = Vec::new();
    let mut cursor = open;
    while cursor < close {
        if rules.closing_policy == ClosingPolicy::WithinHours && cursor + duration > close {
            break;
        }
        let start = local_to_millis(cursor, tz);
        slots.push(TimeSlot {
            start,
            end: start + rules.duration_minutes as i64 * MINUTE_MS,
        });
        cursor += step;
    }
    Ok(slots)
}

/// Millis range `[start, end)` covered by the candidate slots of `date`
///
/// Used to fetch the bookings that can possibly collide.
pub fn search_window(
    date: NaiveDate,
    hours: &BusinessHours,
    rules: &SlotRules,
    tz: Tz,
) -> CoreResult<(i64, i64)> {
    let slots = candidate_slots(date, hours, rules, tz)?;
    let start = slots.first().map(|s| s.start);
    let end = slots.iter().map(|s| s.end).max();
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => {
            let open = local_to_millis(date.and_time(hours.open), tz);
            Ok((open, open))
        }
    }
}

/// Free slots of one staff member on `date`
///
/// `existing` holds that staff member's bookings; cancelled ones are ignored.
/// Every returned slot has zero overlap with every blocking booking.
pub fn compute_available_slots(
    date: NaiveDate,
    existing: &[Appointment],
    hours: &BusinessHours,
    rules: &SlotRules,
    tz: Tz,
) -> CoreResult<Vec<TimeSlot>> {
    let slots = candidate_slots(date, hours, rules, tz)?;
    Ok(slots
        .into_iter()
        .filter(|slot| blocking(existing, slot.start, slot.end, None).next().is_none())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::scheduling::conflict::{overlaps, tests::appt};
    use crate::utils::time::date_time_to_millis;
    use chrono::NaiveTime;
    use shared::models::AppointmentStatus;

    fn tokyo() -> Tz {
        "Asia/Tokyo".parse().unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn at(h: u32, m: u32) -> i64 {
        date_time_to_millis(day(), NaiveTime::from_hms_opt(h, m, 0).unwrap(), tokyo())
    }

    fn hhmm(slots: &[TimeSlot]) -> Vec<String> {
        slots
            .iter()
            .map(|s| {
                chrono::DateTime::from_timestamp_millis(s.start)
                    .unwrap()
                    .with_timezone(&tokyo())
                    .format("%H:%M")
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn empty_day_offers_every_half_hour() {
        let slots =
            compute_available_slots(day(), &[], &BusinessHours::default(), &SlotRules::default(), tokyo())
                .unwrap();
        // 09:00 .. 18:30 inclusive
        assert_eq!(slots.len(), 20);
        assert_eq!(slots[0].start, at(9, 0));
        assert_eq!(slots[0].end, at(10, 0));
        assert_eq!(slots.last().unwrap().start, at(18, 30));
        // Default policy lets the last slot run past closing
        assert_eq!(slots.last().unwrap().end, at(19, 30));
    }

    #[test]
    fn booking_removes_overlapping_slots() {
        let existing = vec![appt(1, 7, at(10, 0), at(11, 0), AppointmentStatus::Scheduled)];
        let slots = compute_available_slots(
            day(),
            &existing,
            &BusinessHours::default(),
            &SlotRules::default(),
            tokyo(),
        )
        .unwrap();
        let starts = hhmm(&slots);

        assert!(starts.contains(&"09:00".to_string()));
        assert!(!starts.contains(&"09:30".to_string()));
        assert!(!starts.contains(&"10:00".to_string()));
        assert!(!starts.contains(&"10:30".to_string()));
        assert!(starts.contains(&"11:00".to_string()));
        assert!(starts.contains(&"11:30".to_string()));

        for slot in &slots {
            for a in &existing {
                assert!(!overlaps(slot.start, slot.end, a.start_time, a.end_time));
            }
        }
    }

    #[test]
    fn thirty_minute_slots_keep_half_hour_neighbours() {
        let rules = SlotRules {
            duration_minutes: 30,
            ..SlotRules::default()
        };
        let existing = vec![appt(1, 7, at(10, 0), at(11, 0), AppointmentStatus::Confirmed)];
        let starts = hhmm(
            &compute_available_slots(day(), &existing, &BusinessHours::default(), &rules, tokyo())
                .unwrap(),
        );
        assert!(starts.contains(&"09:00".to_string()));
        assert!(starts.contains(&"09:30".to_string()));
        assert!(!starts.contains(&"10:00".to_string()));
        assert!(!starts.contains(&"10:30".to_string()));
        assert!(starts.contains(&"11:00".to_string()));
        assert!(starts.contains(&"11:30".to_string()));
    }

    #[test]
    fn cancelled_bookings_do_not_block() {
        let existing = vec![appt(1, 7, at(10, 0), at(11, 0), AppointmentStatus::Cancelled)];
        let slots = compute_available_slots(
            day(),
            &existing,
            &BusinessHours::default(),
            &SlotRules::default(),
            tokyo(),
        )
        .unwrap();
        assert_eq!(slots.len(), 20);
    }

    #[test]
    fn fully_booked_day_is_empty() {
        let existing = vec![appt(1, 7, at(8, 0), at(20, 0), AppointmentStatus::Scheduled)];
        let slots = compute_available_slots(
            day(),
            &existing,
            &BusinessHours::default(),
            &SlotRules::default(),
            tokyo(),
        )
        .unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn within_hours_policy_drops_overrun() {
        let rules = SlotRules {
            closing_policy: ClosingPolicy::WithinHours,
            ..SlotRules::default()
        };
        let slots = candidate_slots(day(), &BusinessHours::default(), &rules, tokyo()).unwrap();
        assert_eq!(slots.last().unwrap().start, at(18, 0));
        assert!(slots.iter().all(|s| s.end <= at(19, 0)));
    }

    #[test]
    fn output_is_ascending() {
        let slots =
            candidate_slots(day(), &BusinessHours::default(), &SlotRules::default(), tokyo()).unwrap();
        assert!(slots.windows(2).all(|w| w[0].start < w[1].start));
    }

    #[test]
    fn invalid_inputs_rejected() {
        let zero_step = SlotRules {
            step_minutes: 0,
            ..SlotRules::default()
        };
        assert!(matches!(
            candidate_slots(day(), &BusinessHours::default(), &zero_step, tokyo()),
            Err(CoreError::InvalidArgument(_))
        ));

        let inverted = BusinessHours::new(
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        assert!(matches!(
            compute_available_slots(day(), &[], &inverted, &SlotRules::default(), tokyo()),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn search_window_spans_overrun() {
        let (start, end) =
            search_window(day(), &BusinessHours::default(), &SlotRules::default(), tokyo()).unwrap();
        assert_eq!(start, at(9, 0));
        assert_eq!(end, at(19, 30));
    }
}
