//! Sales Record Model (売上)

use serde::{Deserialize, Serialize};

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Qr,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
            Self::Qr => "QR",
            Self::Other => "OTHER",
        }
    }
}

/// Sales record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SalesStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
    Refunded,
}

impl SalesStatus {
    /// Whether the record contributes to revenue reporting
    pub fn counts_as_revenue(&self) -> bool {
        matches!(self, Self::Pending | Self::Completed)
    }
}

/// Sales record entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SalesRecord {
    pub id: i64,
    pub customer_id: i64,
    pub staff_id: i64,
    pub appointment_id: Option<i64>,
    /// Amount in yen
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub status: SalesStatus,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (joined on read) --
    #[cfg_attr(feature = "db", sqlx(default))]
    pub customer_name: Option<String>,
    #[cfg_attr(feature = "db", sqlx(default))]
    pub staff_name: Option<String>,
    #[cfg_attr(feature = "db", sqlx(default))]
    pub service_type: Option<String>,
}

/// Create sales record payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecordCreate {
    pub customer_id: i64,
    pub staff_id: i64,
    pub appointment_id: Option<i64>,
    pub amount: i64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub status: SalesStatus,
    /// Backdated creation time (Unix millis); defaults to now
    pub created_at: Option<i64>,
}

/// Update sales record payload (status / payment corrections only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesRecordUpdate {
    pub amount: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<SalesStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revenue_statuses() {
        assert!(SalesStatus::Pending.counts_as_revenue());
        assert!(SalesStatus::Completed.counts_as_revenue());
        assert!(!SalesStatus::Cancelled.counts_as_revenue());
        assert!(!SalesStatus::Refunded.counts_as_revenue());
    }

    #[test]
    fn create_defaults() {
        let json = r#"{"customer_id":1,"staff_id":2,"appointment_id":null,"amount":5000}"#;
        let c: SalesRecordCreate = serde_json::from_str(json).unwrap();
        assert_eq!(c.payment_method, PaymentMethod::Cash);
        assert_eq!(c.status, SalesStatus::Pending);
        assert!(c.created_at.is_none());
    }
}
