//! Sales Goals Model (売上目標)

use serde::{Deserialize, Serialize};

/// Monthly sales targets (singleton row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SalesGoals {
    /// Monthly revenue target (yen)
    pub monthly_sales: i64,
    pub monthly_customers: i64,
    pub monthly_new_customers: i64,
    /// Per-customer spend target (yen); not scaled by period
    pub target_average_transaction: i64,
    pub updated_at: i64,
}

/// Replace goals payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SalesGoalsUpdate {
    pub monthly_sales: i64,
    pub monthly_customers: i64,
    pub monthly_new_customers: i64,
    pub target_average_transaction: i64,
}
