//! Appointment Repository
//!
//! Writes re-check the per-staff overlap invariant inside the same statement,
//! so two concurrent bookings for one slot cannot both land.

use super::{RepoError, RepoResult};
use shared::models::{Appointment, AppointmentCreate, AppointmentStatus, AppointmentUpdate};
use sqlx::SqlitePool;

const SELECT: &str = "SELECT a.id, a.staff_id, a.customer_id, a.start_time, a.end_time, a.service_type, a.status, a.notes, a.created_at, a.updated_at, c.name AS customer_name, s.name AS staff_name FROM appointment a LEFT JOIN customer c ON c.id = a.customer_id LEFT JOIN staff s ON s.id = a.staff_id";

/// Another non-cancelled booking of the same staff member intersects `[start, end)`
const OVERLAP_EXISTS: &str = "EXISTS (SELECT 1 FROM appointment o WHERE o.staff_id = ? AND o.status != 'CANCELLED' AND o.start_time < ? AND o.end_time > ? AND o.id != ?)";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Appointment>> {
    let sql = format!("{SELECT} ORDER BY a.start_time ASC, a.id ASC");
    let appointments = sqlx::query_as::<_, Appointment>(&sql).fetch_all(pool).await?;
    Ok(appointments)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Appointment>> {
    let sql = format!("{SELECT} WHERE a.id = ?");
    let appointment = sqlx::query_as::<_, Appointment>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(appointment)
}

/// Appointments of one staff member intersecting `[start, end)` (any status)
pub async fn find_overlapping(
    pool: &SqlitePool,
    staff_id: i64,
    start: i64,
    end: i64,
) -> RepoResult<Vec<Appointment>> {
    let sql = format!(
        "{SELECT} WHERE a.staff_id = ? AND a.start_time < ? AND a.end_time > ? ORDER BY a.start_time ASC"
    );
    let appointments = sqlx::query_as::<_, Appointment>(&sql)
        .bind(staff_id)
        .bind(end)
        .bind(start)
        .fetch_all(pool)
        .await?;
    Ok(appointments)
}

/// Appointments of one staff member starting within `[start, end)`
pub async fn find_for_staff_between(
    pool: &SqlitePool,
    staff_id: i64,
    start: i64,
    end: i64,
) -> RepoResult<Vec<Appointment>> {
    let sql = format!(
        "{SELECT} WHERE a.staff_id = ? AND a.start_time >= ? AND a.start_time < ? ORDER BY a.start_time ASC"
    );
    let appointments = sqlx::query_as::<_, Appointment>(&sql)
        .bind(staff_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(appointments)
}

pub async fn count_for_staff(pool: &SqlitePool, staff_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointment WHERE staff_id = ?")
        .bind(staff_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert an appointment together with its PENDING cash sales record
///
/// Both rows are written in one transaction. Fails with
/// [`RepoError::Conflict`] if the staff member is already booked.
pub async fn create_with_sale(
    pool: &SqlitePool,
    data: AppointmentCreate,
    price: i64,
) -> RepoResult<Appointment> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let status = data.status.unwrap_or_default();

    let mut tx = pool.begin().await?;

    let guard = if status.blocks_slot() {
        format!(" WHERE NOT {OVERLAP_EXISTS}")
    } else {
        String::new()
    };
    let sql = format!(
        "INSERT INTO appointment (id, staff_id, customer_id, start_time, end_time, service_type, status, notes, created_at, updated_at) SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?{guard}"
    );
    let mut insert = sqlx::query(&sql)
        .bind(id)
        .bind(data.staff_id)
        .bind(data.customer_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.service_type.as_str())
        .bind(status)
        .bind(data.notes.as_deref())
        .bind(now)
        .bind(now);
    if status.blocks_slot() {
        insert = insert
            .bind(data.staff_id)
            .bind(data.end_time)
            .bind(data.start_time)
            .bind(id);
    }
    let rows = insert.execute(&mut *tx).await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Staff {} is already booked between {} and {}",
            data.staff_id, data.start_time, data.end_time
        )));
    }

    sqlx::query(
        "INSERT INTO sales_record (id, customer_id, staff_id, appointment_id, amount, payment_method, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 'CASH', 'PENDING', ?, ?)",
    )
    .bind(shared::util::snowflake_id())
    .bind(data.customer_id)
    .bind(data.staff_id)
    .bind(id)
    .bind(price)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create appointment".into()))
}

/// Apply a partial update, re-checking the overlap invariant when the
/// resulting booking still occupies the slot
///
/// Cancelling a booking voids its PENDING sales record in the same
/// transaction.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: AppointmentUpdate,
) -> RepoResult<Appointment> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Appointment {id} not found")))?;

    let staff_id = data.staff_id.unwrap_or(current.staff_id);
    let start_time = data.start_time.unwrap_or(current.start_time);
    let end_time = data.end_time.unwrap_or(current.end_time);
    let status = data.status.unwrap_or(current.status);
    if end_time <= start_time {
        return Err(RepoError::Validation(format!(
            "end_time ({end_time}) must be after start_time ({start_time})"
        )));
    }

    let now = shared::util::now_millis();
    let guard = if status.blocks_slot() {
        format!(" AND NOT {OVERLAP_EXISTS}")
    } else {
        String::new()
    };
    let sql = format!(
        "UPDATE appointment SET staff_id = ?, customer_id = COALESCE(?, customer_id), start_time = ?, end_time = ?, service_type = COALESCE(?, service_type), status = ?, notes = COALESCE(?, notes), updated_at = ? WHERE id = ?{guard}"
    );
    let mut query = sqlx::query(&sql)
        .bind(staff_id)
        .bind(data.customer_id)
        .bind(start_time)
        .bind(end_time)
        .bind(data.service_type)
        .bind(status)
        .bind(data.notes)
        .bind(now)
        .bind(id);
    if status.blocks_slot() {
        query = query.bind(staff_id).bind(end_time).bind(start_time).bind(id);
    }

    let mut tx = pool.begin().await?;
    let rows = query.execute(&mut *tx).await?;

    if rows.rows_affected() == 0 {
        tx.rollback().await?;
        return match find_by_id(pool, id).await? {
            Some(_) => Err(RepoError::Conflict(format!(
                "Staff {staff_id} is already booked between {start_time} and {end_time}"
            ))),
            None => Err(RepoError::NotFound(format!("Appointment {id} not found"))),
        };
    }

    if current.status.blocks_slot() && !status.blocks_slot() {
        void_pending_sale(&mut tx, id, now).await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Appointment {id} not found")))
}

/// Delete a booking, voiding its PENDING sales record first
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    void_pending_sale(&mut tx, id, shared::util::now_millis()).await?;
    let rows = sqlx::query("DELETE FROM appointment WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}

/// Cancel without deleting. The linked sale stays, marked CANCELLED.
pub async fn cancel(pool: &SqlitePool, id: i64) -> RepoResult<Appointment> {
    update(
        pool,
        id,
        AppointmentUpdate {
            status: Some(AppointmentStatus::Cancelled),
            ..Default::default()
        },
    )
    .await
}

async fn void_pending_sale(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    appointment_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE sales_record SET status = 'CANCELLED', updated_at = ? WHERE appointment_id = ? AND status = 'PENDING'",
    )
    .bind(now)
    .bind(appointment_id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected())
}
