//! Store-backed reporting operations

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use shared::models::{ReportPeriod, StaffPerformance, SummaryMetrics};

use super::period::PeriodWindow;
use super::summary;
use crate::core::Config;
use crate::db::store::{RecordStore, fetch};
use crate::error::{CoreError, CoreResult};
use crate::scheduling::service::parse_day;
use crate::utils::time;

/// Reporting operations over an injected store
pub struct Reporter<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    tz: Tz,
    fetch_timeout_ms: u64,
}

impl<'a, S: RecordStore + ?Sized> Reporter<'a, S> {
    pub fn new(store: &'a S, config: &Config) -> Self {
        Self {
            store,
            tz: config.timezone,
            fetch_timeout_ms: config.fetch_timeout_ms,
        }
    }

    /// Sales summary for `period` around `date` (YYYY-MM-DD, default today)
    pub async fn summary(&self, period: &str, date: Option<&str>) -> CoreResult<SummaryMetrics> {
        let period: ReportPeriod = period
            .parse()
            .map_err(|e: shared::models::InvalidPeriod| CoreError::invalid(e.to_string()))?;
        let reference = match date {
            Some(d) => parse_day(d)?,
            None => time::today(self.tz),
        };

        let window = PeriodWindow::new(period, reference, self.tz);
        let previous_window = window.previous();

        let (current, previous) = tokio::try_join!(
            async {
                fetch(
                    self.fetch_timeout_ms,
                    "sales records",
                    self.store.sales_between(window.start, window.end),
                )
                .await
                .map_err(CoreError::fetch("sales records"))
            },
            async {
                fetch(
                    self.fetch_timeout_ms,
                    "previous sales records",
                    self.store
                        .sales_between(previous_window.start, previous_window.end),
                )
                .await
                .map_err(CoreError::fetch("previous sales records"))
            },
        )?;

        let customer_ids: Vec<i64> = current
            .iter()
            .chain(previous.iter())
            .filter(|r| r.status.counts_as_revenue())
            .map(|r| r.customer_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let (history, goals) = tokio::try_join!(
            async {
                fetch(
                    self.fetch_timeout_ms,
                    "customer history",
                    self.store.first_purchase_times(&customer_ids),
                )
                .await
                .map_err(CoreError::fetch("customer history"))
            },
            async {
                fetch(self.fetch_timeout_ms, "sales goals", self.store.sales_goals())
                    .await
                    .map_err(CoreError::fetch("sales goals"))
            },
        )?;

        let metrics = summary::compute_summary(&window, &current, &previous, &history, &goals);
        tracing::debug!(
            period = %period,
            reference = %reference,
            total_sales = metrics.total_sales,
            customers = metrics.customer_count,
            "Sales summary computed"
        );
        Ok(metrics)
    }

    /// Performance of `staff_id` between two dates, both inclusive
    pub async fn staff_performance(
        &self,
        staff_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> CoreResult<StaffPerformance> {
        let first: NaiveDate = parse_day(start_date)?;
        let last: NaiveDate = parse_day(end_date)?;
        if last < first {
            return Err(CoreError::invalid(format!(
                "end_date ({last}) is before start_date ({first})"
            )));
        }
        let start = time::day_start_millis(first, self.tz);
        let end = time::day_start_millis(last + Duration::days(1), self.tz);

        let (records, appointments) = tokio::try_join!(
            async {
                fetch(
                    self.fetch_timeout_ms,
                    "sales records",
                    self.store.staff_sales_between(staff_id, start, end),
                )
                .await
                .map_err(CoreError::fetch("sales records"))
            },
            async {
                fetch(
                    self.fetch_timeout_ms,
                    "appointments",
                    self.store.staff_appointments_between(staff_id, start, end),
                )
                .await
                .map_err(CoreError::fetch("appointments"))
            },
        )?;

        Ok(summary::staff_performance(staff_id, &records, &appointments))
    }
}
