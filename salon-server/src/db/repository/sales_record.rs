//! Sales Record Repository

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use shared::models::{SalesRecord, SalesRecordCreate, SalesRecordUpdate};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const SELECT: &str = "SELECT r.id, r.customer_id, r.staff_id, r.appointment_id, r.amount, r.payment_method, r.status, r.created_at, r.updated_at, c.name AS customer_name, s.name AS staff_name, a.service_type AS service_type FROM sales_record r LEFT JOIN customer c ON c.id = r.customer_id LEFT JOIN staff s ON s.id = r.staff_id LEFT JOIN appointment a ON a.id = r.appointment_id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<SalesRecord>> {
    let sql = format!("{SELECT} ORDER BY r.created_at DESC, r.id DESC");
    let records = sqlx::query_as::<_, SalesRecord>(&sql).fetch_all(pool).await?;
    Ok(records)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<SalesRecord>> {
    let sql = format!("{SELECT} WHERE r.id = ?");
    let record = sqlx::query_as::<_, SalesRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

/// Records created within `[start, end)`, any status
pub async fn find_between(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<SalesRecord>> {
    let sql = format!(
        "{SELECT} WHERE r.created_at >= ? AND r.created_at < ? ORDER BY r.created_at ASC, r.id ASC"
    );
    let records = sqlx::query_as::<_, SalesRecord>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(records)
}

/// Records of one staff member created within `[start, end)`, any status
pub async fn find_for_staff_between(
    pool: &SqlitePool,
    staff_id: i64,
    start: i64,
    end: i64,
) -> RepoResult<Vec<SalesRecord>> {
    let sql = format!(
        "{SELECT} WHERE r.staff_id = ? AND r.created_at >= ? AND r.created_at < ? ORDER BY r.created_at ASC, r.id ASC"
    );
    let records = sqlx::query_as::<_, SalesRecord>(&sql)
        .bind(staff_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(records)
}

/// Earliest revenue-counting purchase per customer, over the full history
pub async fn first_purchase_times(
    pool: &SqlitePool,
    customer_ids: &[i64],
) -> RepoResult<HashMap<i64, i64>> {
    if customer_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT customer_id, MIN(created_at) FROM sales_record WHERE status IN ('PENDING', 'COMPLETED') AND customer_id IN (",
    );
    let mut ids = builder.separated(", ");
    for id in customer_ids {
        ids.push_bind(*id);
    }
    builder.push(") GROUP BY customer_id");

    let rows: Vec<(i64, i64)> = builder.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().collect())
}

pub async fn create(pool: &SqlitePool, data: SalesRecordCreate) -> RepoResult<SalesRecord> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO sales_record (id, customer_id, staff_id, appointment_id, amount, payment_method, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.customer_id)
    .bind(data.staff_id)
    .bind(data.appointment_id)
    .bind(data.amount)
    .bind(data.payment_method)
    .bind(data.status)
    .bind(data.created_at.unwrap_or(now))
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create sales record".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: SalesRecordUpdate) -> RepoResult<SalesRecord> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE sales_record SET amount = COALESCE(?, amount), payment_method = COALESCE(?, payment_method), status = COALESCE(?, status), updated_at = ? WHERE id = ?",
    )
    .bind(data.amount)
    .bind(data.payment_method)
    .bind(data.status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Sales record {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Sales record {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM sales_record WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::appointment::tests::seed;
    use shared::models::{PaymentMethod, SalesStatus};

    fn sale(staff_id: i64, customer_id: i64, amount: i64, at: i64) -> SalesRecordCreate {
        SalesRecordCreate {
            customer_id,
            staff_id,
            appointment_id: None,
            amount,
            payment_method: PaymentMethod::Card,
            status: SalesStatus::Completed,
            created_at: Some(at),
        }
    }

    #[tokio::test]
    async fn range_is_half_open() {
        let db = DbService::open_in_memory().await.unwrap();
        let (staff_id, customer_id) = seed(&db.pool).await;
        for at in [100, 200, 300] {
            create(&db.pool, sale(staff_id, customer_id, 1000, at)).await.unwrap();
        }
        let records = find_between(&db.pool, 100, 300).await.unwrap();
        let times: Vec<_> = records.iter().map(|r| r.created_at).collect();
        assert_eq!(times, vec![100, 200]);
        assert_eq!(records[0].staff_name.as_deref(), Some("Sato"));
        assert!(records[0].service_type.is_none());
    }

    #[tokio::test]
    async fn first_purchase_ignores_cancelled() {
        let db = DbService::open_in_memory().await.unwrap();
        let (staff_id, customer_id) = seed(&db.pool).await;

        let mut cancelled = sale(staff_id, customer_id, 500, 50);
        cancelled.status = SalesStatus::Cancelled;
        create(&db.pool, cancelled).await.unwrap();
        create(&db.pool, sale(staff_id, customer_id, 500, 150)).await.unwrap();
        create(&db.pool, sale(staff_id, customer_id, 500, 250)).await.unwrap();

        let first = first_purchase_times(&db.pool, &[customer_id, 999]).await.unwrap();
        assert_eq!(first.get(&customer_id), Some(&150));
        assert!(!first.contains_key(&999));
        assert!(first_purchase_times(&db.pool, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_correction() {
        let db = DbService::open_in_memory().await.unwrap();
        let (staff_id, customer_id) = seed(&db.pool).await;
        let r = create(&db.pool, sale(staff_id, customer_id, 3000, 10)).await.unwrap();

        let r = update(
            &db.pool,
            r.id,
            SalesRecordUpdate {
                status: Some(SalesStatus::Refunded),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(r.status, SalesStatus::Refunded);
        assert_eq!(r.payment_method, PaymentMethod::Card);
        assert_eq!(r.amount, 3000);
    }
}
