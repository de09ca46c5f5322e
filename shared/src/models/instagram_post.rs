//! Instagram Post Model (投稿予約)

use serde::{Deserialize, Serialize};

/// Post lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PostStatus {
    #[default]
    Draft,
    Scheduled,
    Published,
    Failed,
}

/// Instagram post entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InstagramPost {
    pub id: i64,
    pub caption: String,
    pub image_url: Option<String>,
    pub status: PostStatus,
    /// Planned publish time (Unix millis)
    pub scheduled_time: Option<i64>,
    pub published_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create post payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramPostCreate {
    pub caption: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    pub scheduled_time: Option<i64>,
}

/// Update post payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstagramPostUpdate {
    pub caption: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<PostStatus>,
    pub scheduled_time: Option<i64>,
    pub published_at: Option<i64>,
}
