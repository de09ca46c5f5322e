//! Staff Model (スタッフ)

use serde::{Deserialize, Serialize};

/// Staff member entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Free-form role label (stylist, nailist, reception, ...)
    pub role: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

/// Update staff payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Staff performance over a date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPerformance {
    pub staff_id: i64,
    pub total_sales: i64,
    pub total_appointments: i64,
    /// total_sales / number of sales records, rounded
    pub average_service_value: i64,
}
