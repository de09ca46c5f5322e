//! Customer Model (顧客)

use serde::{Deserialize, Serialize};

/// Customer entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// YYYY-MM-DD
    pub birthday: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<String>,
    pub notes: Option<String>,
}

/// Update customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<String>,
    pub notes: Option<String>,
}
