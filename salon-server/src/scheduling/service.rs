//! Store-backed scheduling operations
//!
//! Every read goes through [`fetch`] with the configured timeout. Bookings are
//! gated on [`find_conflicts`]; the repository repeats the overlap check in
//! the insert/update statement itself.

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::models::{Appointment, AppointmentCreate, AppointmentUpdate, TimeSlot};

use super::availability::{compute_available_slots, search_window};
use super::conflict::find_conflicts;
use super::{BusinessHours, SlotRules};
use crate::core::Config;
use crate::db::repository::RepoError;
use crate::db::store::{FetchError, RecordStore, fetch};
use crate::error::{CoreError, CoreResult};
use crate::menu::service_price;
use crate::utils::time;

/// Scheduling operations over an injected store
pub struct Scheduler<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    hours: BusinessHours,
    rules: SlotRules,
    tz: Tz,
    fetch_timeout_ms: u64,
}

pub(crate) fn parse_day(date: &str) -> CoreResult<NaiveDate> {
    time::parse_date(date).map_err(|e| CoreError::InvalidArgument(e.message))
}

fn check_interval(start: i64, end: i64) -> CoreResult<()> {
    if end <= start {
        return Err(CoreError::invalid(format!(
            "end ({end}) must be after start ({start})"
        )));
    }
    Ok(())
}

/// Map a failed write to the core taxonomy
fn write_error(staff_id: i64, err: RepoError) -> CoreError {
    match err {
        RepoError::Conflict(_) => CoreError::SlotConflict {
            staff_id,
            conflicting: Vec::new(),
        },
        RepoError::NotFound(msg) => CoreError::NotFound(msg),
        RepoError::Validation(msg) => CoreError::InvalidArgument(msg),
        other => CoreError::FetchFailure {
            what: "appointment",
            source: FetchError::Store(other),
        },
    }
}

impl<'a, S: RecordStore + ?Sized> Scheduler<'a, S> {
    pub fn new(store: &'a S, config: &Config) -> Self {
        Self {
            store,
            hours: config.business_hours,
            rules: config.slot_rules,
            tz: config.timezone,
            fetch_timeout_ms: config.fetch_timeout_ms,
        }
    }

    /// Free slots of `staff_id` on `date` (YYYY-MM-DD)
    pub async fn available_slots(&self, staff_id: i64, date: &str) -> CoreResult<Vec<TimeSlot>> {
        let date = parse_day(date)?;
        let (start, end) = search_window(date, &self.hours, &self.rules, self.tz)?;
        let existing = fetch(
            self.fetch_timeout_ms,
            "appointments",
            self.store.appointments_overlapping(staff_id, start, end),
        )
        .await
        .map_err(CoreError::fetch("appointments"))?;

        compute_available_slots(date, &existing, &self.hours, &self.rules, self.tz)
    }

    /// Bookings of `staff_id` that `[start, end)` would collide with
    pub async fn conflicts(
        &self,
        staff_id: i64,
        start: i64,
        end: i64,
        exclude_id: Option<i64>,
    ) -> CoreResult<Vec<Appointment>> {
        check_interval(start, end)?;
        let existing = fetch(
            self.fetch_timeout_ms,
            "appointments",
            self.store.appointments_overlapping(staff_id, start, end),
        )
        .await
        .map_err(CoreError::fetch("appointments"))?;

        Ok(find_conflicts(&existing, staff_id, start, end, exclude_id)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn has_conflict(
        &self,
        staff_id: i64,
        start: i64,
        end: i64,
        exclude_id: Option<i64>,
    ) -> CoreResult<bool> {
        Ok(!self.conflicts(staff_id, start, end, exclude_id).await?.is_empty())
    }

    async fn ensure_free(
        &self,
        staff_id: i64,
        start: i64,
        end: i64,
        exclude_id: Option<i64>,
    ) -> CoreResult<()> {
        let hits = self.conflicts(staff_id, start, end, exclude_id).await?;
        if !hits.is_empty() {
            return Err(CoreError::SlotConflict {
                staff_id,
                conflicting: hits.iter().map(|a| a.id).collect(),
            });
        }
        Ok(())
    }

    /// Create a booking and its pending sales record
    pub async fn book(&self, data: AppointmentCreate) -> CoreResult<Appointment> {
        let status = data.status.unwrap_or_default();
        if status.blocks_slot() {
            self.ensure_free(data.staff_id, data.start_time, data.end_time, None)
                .await?;
        } else {
            check_interval(data.start_time, data.end_time)?;
        }

        let staff_id = data.staff_id;
        let price = service_price(&data.service_type);
        let appointment = self
            .store
            .insert_appointment(data, price)
            .await
            .map_err(|e| write_error(staff_id, e))?;

        tracing::info!(
            appointment_id = appointment.id,
            staff_id,
            start = appointment.start_time,
            price,
            "Appointment booked"
        );
        Ok(appointment)
    }

    /// Apply an update, re-checking overlap when the result occupies a slot
    /// it did not occupy before
    pub async fn reschedule(&self, id: i64, data: AppointmentUpdate) -> CoreResult<Appointment> {
        let current = fetch(
            self.fetch_timeout_ms,
            "appointment",
            self.store.find_appointment(id),
        )
        .await
        .map_err(CoreError::fetch("appointment"))?
        .ok_or_else(|| CoreError::NotFound(format!("Appointment {id} not found")))?;

        let staff_id = data.staff_id.unwrap_or(current.staff_id);
        let start = data.start_time.unwrap_or(current.start_time);
        let end = data.end_time.unwrap_or(current.end_time);
        let status = data.status.unwrap_or(current.status);

        let reactivated = status.blocks_slot() && !current.status.blocks_slot();
        if status.blocks_slot() && (data.reschedules() || reactivated) {
            self.ensure_free(staff_id, start, end, Some(id)).await?;
        } else {
            check_interval(start, end)?;
        }

        self.store
            .update_appointment(id, data)
            .await
            .map_err(|e| write_error(staff_id, e))
    }

    /// All bookings of `staff_id` starting on `date`, ordered by start
    pub async fn day_schedule(&self, staff_id: i64, date: &str) -> CoreResult<Vec<Appointment>> {
        let date = parse_day(date)?;
        fetch(
            self.fetch_timeout_ms,
            "appointments",
            self.store.staff_appointments_between(
                staff_id,
                time::day_start_millis(date, self.tz),
                time::day_end_millis(date, self.tz),
            ),
        )
        .await
        .map_err(CoreError::fetch("appointments"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::appointment::tests::{booking, seed};
    use crate::db::repository::sales_record;
    use crate::db::store::StallingStore;
    use crate::db::{DbService, SqliteStore};
    use chrono::NaiveTime;
    use shared::models::AppointmentStatus;

    fn at(h: u32, m: u32) -> i64 {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        time::date_time_to_millis(
            date,
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            chrono_tz::Asia::Tokyo,
        )
    }

    #[tokio::test]
    async fn book_then_query_availability() {
        let db = DbService::open_in_memory().await.unwrap();
        let (staff_id, customer_id) = seed(&db.pool).await;
        let store = SqliteStore::new(db.pool.clone());
        let config = Config::default();
        let scheduler = Scheduler::new(&store, &config);

        let a = scheduler
            .book(booking(staff_id, customer_id, at(10, 0), at(11, 0)))
            .await
            .unwrap();
        assert_eq!(a.status, AppointmentStatus::Scheduled);

        // Pending sale priced from the menu
        let sales = sales_record::find_all(&db.pool).await.unwrap();
        assert_eq!(sales[0].amount, 8000);

        let slots = scheduler.available_slots(staff_id, "2024-03-15").await.unwrap();
        assert!(slots.iter().any(|s| s.start == at(9, 0)));
        assert!(!slots.iter().any(|s| s.start == at(10, 0)));
        assert!(!slots.iter().any(|s| s.start == at(10, 30)));
        assert!(slots.iter().any(|s| s.start == at(11, 0)));

        assert!(scheduler.has_conflict(staff_id, at(10, 30), at(11, 30), None).await.unwrap());
        assert!(!scheduler.has_conflict(staff_id, at(10, 30), at(11, 30), Some(a.id)).await.unwrap());
        assert!(!scheduler.has_conflict(staff_id, at(11, 0), at(12, 0), None).await.unwrap());
    }

    #[tokio::test]
    async fn double_booking_is_a_slot_conflict() {
        let db = DbService::open_in_memory().await.unwrap();
        let (staff_id, customer_id) = seed(&db.pool).await;
        let store = SqliteStore::new(db.pool.clone());
        let config = Config::default();
        let scheduler = Scheduler::new(&store, &config);

        let first = scheduler
            .book(booking(staff_id, customer_id, at(10, 0), at(11, 0)))
            .await
            .unwrap();
        let err = scheduler
            .book(booking(staff_id, customer_id, at(10, 30), at(11, 30)))
            .await
            .unwrap_err();
        match err {
            CoreError::SlotConflict { conflicting, .. } => assert_eq!(conflicting, vec![first.id]),
            other => panic!("expected SlotConflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reschedule_checks_new_interval() {
        let db = DbService::open_in_memory().await.unwrap();
        let (staff_id, customer_id) = seed(&db.pool).await;
        let store = SqliteStore::new(db.pool.clone());
        let config = Config::default();
        let scheduler = Scheduler::new(&store, &config);

        let morning = scheduler
            .book(booking(staff_id, customer_id, at(9, 0), at(10, 0)))
            .await
            .unwrap();
        scheduler
            .book(booking(staff_id, customer_id, at(13, 0), at(14, 0)))
            .await
            .unwrap();

        // Extending into its own interval is fine
        let moved = scheduler
            .reschedule(
                morning.id,
                AppointmentUpdate {
                    end_time: Some(at(10, 30)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.end_time, at(10, 30));

        // Moving onto the afternoon booking is not
        let err = scheduler
            .reschedule(
                morning.id,
                AppointmentUpdate {
                    start_time: Some(at(13, 30)),
                    end_time: Some(at(14, 30)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::SlotConflict { .. }));

        // Notes-only edits skip the gate
        scheduler
            .reschedule(
                morning.id,
                AppointmentUpdate {
                    notes: Some("フレンチ希望".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = scheduler
            .reschedule(999, AppointmentUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn day_schedule_and_bad_dates() {
        let db = DbService::open_in_memory().await.unwrap();
        let (staff_id, customer_id) = seed(&db.pool).await;
        let store = SqliteStore::new(db.pool.clone());
        let config = Config::default();
        let scheduler = Scheduler::new(&store, &config);

        scheduler
            .book(booking(staff_id, customer_id, at(15, 0), at(16, 0)))
            .await
            .unwrap();
        scheduler
            .book(booking(staff_id, customer_id, at(9, 0), at(10, 0)))
            .await
            .unwrap();

        let day = scheduler.day_schedule(staff_id, "2024-03-15").await.unwrap();
        assert_eq!(day.iter().map(|a| a.start_time).collect::<Vec<_>>(), vec![at(9, 0), at(15, 0)]);
        assert!(scheduler.day_schedule(staff_id, "2024-03-16").await.unwrap().is_empty());

        assert!(matches!(
            scheduler.available_slots(staff_id, "15/03/2024").await,
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            scheduler.has_conflict(staff_id, at(10, 0), at(10, 0), None).await,
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn stalled_store_fails_fetch() {
        let config = Config {
            fetch_timeout_ms: 20,
            ..Config::default()
        };
        let scheduler = Scheduler::new(&StallingStore, &config);
        let err = scheduler.available_slots(1, "2024-03-15").await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::FetchFailure {
                source: FetchError::Timeout(20),
                ..
            }
        ));
    }
}
