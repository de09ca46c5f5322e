//! Record store capability
//!
//! The scheduling and reporting services never touch the pool directly.
//! They receive a [`RecordStore`] and every read goes through [`fetch`],
//! which bounds it with a timeout.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use shared::models::{Appointment, AppointmentCreate, AppointmentUpdate, SalesGoals, SalesRecord};
use sqlx::SqlitePool;
use thiserror::Error;

use super::repository::{RepoError, RepoResult, appointment, sales_goals, sales_record};

/// Why a store read did not produce data
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Store(#[from] RepoError),

    #[error("timed out after {0} ms")]
    Timeout(u64),
}

/// Run a store read with an upper bound on its duration
pub async fn fetch<T, F>(timeout_ms: u64, what: &'static str, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = RepoResult<T>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
        Ok(result) => result.map_err(|e| {
            tracing::warn!(what, error = %e, "Store fetch failed");
            FetchError::Store(e)
        }),
        Err(_) => {
            tracing::warn!(what, timeout_ms, "Store fetch timed out");
            Err(FetchError::Timeout(timeout_ms))
        }
    }
}

/// Record store operations used by the core services
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appointments of `staff_id` intersecting `[start, end)`, any status
    async fn appointments_overlapping(
        &self,
        staff_id: i64,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<Appointment>>;

    /// Appointments of `staff_id` starting within `[start, end)`, ordered by start
    async fn staff_appointments_between(
        &self,
        staff_id: i64,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<Appointment>>;

    async fn find_appointment(&self, id: i64) -> RepoResult<Option<Appointment>>;

    /// Insert a booking and its pending sales record atomically
    async fn insert_appointment(&self, data: AppointmentCreate, price: i64) -> RepoResult<Appointment>;

    async fn update_appointment(&self, id: i64, data: AppointmentUpdate) -> RepoResult<Appointment>;

    /// Sales records created within `[start, end)`, any status
    async fn sales_between(&self, start: i64, end: i64) -> RepoResult<Vec<SalesRecord>>;

    /// Sales records of `staff_id` created within `[start, end)`, any status
    async fn staff_sales_between(
        &self,
        staff_id: i64,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<SalesRecord>>;

    /// Earliest revenue-counting purchase time per customer
    async fn first_purchase_times(&self, customer_ids: &[i64]) -> RepoResult<HashMap<i64, i64>>;

    async fn sales_goals(&self) -> RepoResult<SalesGoals>;
}

/// SQLite-backed store delegating to the repository modules
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn appointments_overlapping(
        &self,
        staff_id: i64,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<Appointment>> {
        appointment::find_overlapping(&self.pool, staff_id, start, end).await
    }

    async fn staff_appointments_between(
        &self,
        staff_id: i64,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<Appointment>> {
        appointment::find_for_staff_between(&self.pool, staff_id, start, end).await
    }

    async fn find_appointment(&self, id: i64) -> RepoResult<Option<Appointment>> {
        appointment::find_by_id(&self.pool, id).await
    }

    async fn insert_appointment(&self, data: AppointmentCreate, price: i64) -> RepoResult<Appointment> {
        appointment::create_with_sale(&self.pool, data, price).await
    }

    async fn update_appointment(&self, id: i64, data: AppointmentUpdate) -> RepoResult<Appointment> {
        appointment::update(&self.pool, id, data).await
    }

    async fn sales_between(&self, start: i64, end: i64) -> RepoResult<Vec<SalesRecord>> {
        sales_record::find_between(&self.pool, start, end).await
    }

    async fn staff_sales_between(
        &self,
        staff_id: i64,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<SalesRecord>> {
        sales_record::find_for_staff_between(&self.pool, staff_id, start, end).await
    }

    async fn first_purchase_times(&self, customer_ids: &[i64]) -> RepoResult<HashMap<i64, i64>> {
        sales_record::first_purchase_times(&self.pool, customer_ids).await
    }

    async fn sales_goals(&self) -> RepoResult<SalesGoals> {
        sales_goals::get(&self.pool).await
    }
}

/// Store whose every call hangs; exercises fetch timeouts
#[cfg(test)]
pub(crate) struct StallingStore;

#[cfg(test)]
impl StallingStore {
    async fn stall<T>() -> RepoResult<T> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(RepoError::Database("unreachable".into()))
    }
}

#[cfg(test)]
#[async_trait]
impl RecordStore for StallingStore {
    async fn appointments_overlapping(&self, _: i64, _: i64, _: i64) -> RepoResult<Vec<Appointment>> {
        Self::stall().await
    }
    async fn staff_appointments_between(&self, _: i64, _: i64, _: i64) -> RepoResult<Vec<Appointment>> {
        Self::stall().await
    }
    async fn find_appointment(&self, _: i64) -> RepoResult<Option<Appointment>> {
        Self::stall().await
    }
    async fn insert_appointment(&self, _: AppointmentCreate, _: i64) -> RepoResult<Appointment> {
        Self::stall().await
    }
    async fn update_appointment(&self, _: i64, _: AppointmentUpdate) -> RepoResult<Appointment> {
        Self::stall().await
    }
    async fn sales_between(&self, _: i64, _: i64) -> RepoResult<Vec<SalesRecord>> {
        Self::stall().await
    }
    async fn staff_sales_between(&self, _: i64, _: i64, _: i64) -> RepoResult<Vec<SalesRecord>> {
        Self::stall().await
    }
    async fn first_purchase_times(&self, _: &[i64]) -> RepoResult<HashMap<i64, i64>> {
        Self::stall().await
    }
    async fn sales_goals(&self) -> RepoResult<SalesGoals> {
        Self::stall().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_passes_through_results() {
        let value = fetch(100, "answer", async { Ok::<_, RepoError>(42) }).await.unwrap();
        assert_eq!(value, 42);

        let err = fetch(100, "missing", async {
            Err::<i64, _>(RepoError::Database("disk I/O error".into()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, FetchError::Store(RepoError::Database(_))));
    }

    #[tokio::test]
    async fn fetch_times_out() {
        let err = fetch(50, "slow", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, RepoError>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, FetchError::Timeout(50)));
    }
}
