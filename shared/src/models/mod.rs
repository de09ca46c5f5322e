//! Data models
//!
//! Shared between salon-server and the admin front end (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps Unix millis.

pub mod appointment;
pub mod counseling_sheet;
pub mod customer;
pub mod instagram_post;
pub mod sales_goals;
pub mod sales_record;
pub mod sales_summary;
pub mod staff;

// Re-exports
pub use appointment::*;
pub use counseling_sheet::*;
pub use customer::*;
pub use instagram_post::*;
pub use sales_goals::*;
pub use sales_record::*;
pub use sales_summary::*;
pub use staff::*;
