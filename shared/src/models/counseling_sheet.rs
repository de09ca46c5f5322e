//! Counseling Sheet Model (カウンセリングシート)

use serde::{Deserialize, Serialize};

/// Counseling sheet status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CounselingStatus {
    #[default]
    Draft,
    Completed,
    Archived,
}

/// Counseling sheet entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CounselingSheet {
    pub id: i64,
    pub customer_id: i64,
    pub status: CounselingStatus,
    pub concerns: Option<String>,
    pub allergies: Option<String>,
    pub preferences: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (joined on read) --
    #[cfg_attr(feature = "db", sqlx(default))]
    pub customer_name: Option<String>,
    #[cfg_attr(feature = "db", sqlx(default))]
    pub customer_email: Option<String>,
    #[cfg_attr(feature = "db", sqlx(default))]
    pub customer_phone: Option<String>,
}

/// Create counseling sheet payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounselingSheetCreate {
    pub customer_id: i64,
    #[serde(default)]
    pub status: CounselingStatus,
    pub concerns: Option<String>,
    pub allergies: Option<String>,
    pub preferences: Option<String>,
    pub notes: Option<String>,
}

/// Update counseling sheet payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CounselingSheetUpdate {
    pub status: Option<CounselingStatus>,
    pub concerns: Option<String>,
    pub allergies: Option<String>,
    pub preferences: Option<String>,
    pub notes: Option<String>,
}
