//! Sales summary reductions
//!
//! Only PENDING and COMPLETED records count; CANCELLED and REFUNDED ones
//! are dropped before every reduction. Division by zero yields 0.

use std::collections::{BTreeMap, HashMap, HashSet};

use shared::models::{Appointment, SalesGoals, SalesRecord, StaffPerformance, SummaryMetrics};

use super::period::PeriodWindow;

/// Earliest counting purchase (millis) per customer id, over the full history
pub type CustomerHistory = HashMap<i64, i64>;

/// Label for records without an appointment service
pub const UNKNOWN_SERVICE: &str = "その他";
/// Label for records whose staff member no longer exists
pub const UNKNOWN_STAFF: &str = "Unknown";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct WindowTotals {
    total_sales: i64,
    customer_count: i64,
    average_transaction: i64,
    new_customers: i64,
    transactions: i64,
}

fn counted<'a>(
    records: &'a [SalesRecord],
    window: &'a PeriodWindow,
) -> impl Iterator<Item = &'a SalesRecord> {
    records
        .iter()
        .filter(move |r| r.status.counts_as_revenue() && window.contains(r.created_at))
}

/// `numerator / denominator` rounded half away from zero, 0 for an empty denominator
fn rounded_ratio(numerator: i64, denominator: i64) -> i64 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64).round() as i64
}

/// Percent change from `previous` to `current`, 0 when there is no baseline
pub fn trend(current: i64, previous: i64) -> i64 {
    if previous == 0 {
        return 0;
    }
    ((current - previous) as f64 / previous as f64 * 100.0).round() as i64
}

/// Progress toward `goal` in percent, clamped to `[0, 100]`, one decimal
pub fn progress(metric: i64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    let pct = (metric as f64 / goal * 100.0).clamp(0.0, 100.0);
    (pct * 10.0).round() / 10.0
}

fn totals(records: &[SalesRecord], window: &PeriodWindow, history: &CustomerHistory) -> WindowTotals {
    let mut total_sales = 0;
    let mut transactions = 0;
    let mut customers = HashSet::new();
    for r in counted(records, window) {
        total_sales += r.amount;
        transactions += 1;
        customers.insert(r.customer_id);
    }

    // New: no counting purchase strictly before the window start
    let new_customers = customers
        .iter()
        .filter(|id| history.get(*id).is_none_or(|first| *first >= window.start))
        .count() as i64;

    let customer_count = customers.len() as i64;
    WindowTotals {
        total_sales,
        customer_count,
        average_transaction: rounded_ratio(total_sales, customer_count),
        new_customers,
        transactions,
    }
}

/// Aggregate the current window and compare it with the previous one
///
/// Records outside their window are ignored, so callers may pass wider
/// snapshots. Pure: the same inputs always produce the same metrics.
pub fn compute_summary(
    window: &PeriodWindow,
    current: &[SalesRecord],
    previous: &[SalesRecord],
    history: &CustomerHistory,
    goals: &SalesGoals,
) -> SummaryMetrics {
    let previous_window = window.previous();
    let cur = totals(current, window, history);
    let prev = totals(previous, &previous_window, history);

    let mut by_payment_method = BTreeMap::new();
    let mut by_service = BTreeMap::new();
    let mut by_staff = BTreeMap::new();
    for r in counted(current, window) {
        *by_payment_method
            .entry(r.payment_method.as_str().to_string())
            .or_insert(0) += r.amount;
        *by_service
            .entry(r.service_type.clone().unwrap_or_else(|| UNKNOWN_SERVICE.to_string()))
            .or_insert(0) += r.amount;
        *by_staff
            .entry(r.staff_name.clone().unwrap_or_else(|| UNKNOWN_STAFF.to_string()))
            .or_insert(0) += r.amount;
    }

    let scale = window.goal_scale();
    SummaryMetrics {
        period: window.period,
        start: window.start,
        end: window.end,

        total_sales: cur.total_sales,
        sales_trend: trend(cur.total_sales, prev.total_sales),
        sales_progress: progress(cur.total_sales, goals.monthly_sales as f64 * scale),

        customer_count: cur.customer_count,
        customer_trend: trend(cur.customer_count, prev.customer_count),
        customer_progress: progress(cur.customer_count, goals.monthly_customers as f64 * scale),

        average_transaction: cur.average_transaction,
        avg_transaction_trend: trend(cur.average_transaction, prev.average_transaction),
        avg_transaction_progress: progress(
            cur.average_transaction,
            goals.target_average_transaction as f64,
        ),

        new_customers: cur.new_customers,
        new_customer_trend: trend(cur.new_customers, prev.new_customers),
        new_customer_progress: progress(
            cur.new_customers,
            goals.monthly_new_customers as f64 * scale,
        ),

        total_transactions: cur.transactions,
        by_payment_method,
        by_service,
        by_staff,
    }
}

/// Performance of one staff member over the given records and bookings
///
/// The average is per sales record. Cancelled bookings are not counted.
pub fn staff_performance(
    staff_id: i64,
    records: &[SalesRecord],
    appointments: &[Appointment],
) -> StaffPerformance {
    let counting: Vec<_> = records
        .iter()
        .filter(|r| r.staff_id == staff_id && r.status.counts_as_revenue())
        .collect();
    let total_sales: i64 = counting.iter().map(|r| r.amount).sum();
    let total_appointments = appointments
        .iter()
        .filter(|a| a.staff_id == staff_id && a.status.blocks_slot())
        .count() as i64;

    StaffPerformance {
        staff_id,
        total_sales,
        total_appointments,
        average_service_value: rounded_ratio(total_sales, counting.len() as i64),
    }
}
