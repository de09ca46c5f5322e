//! Reporting - sales summary aggregation and staff performance
//!
//! - [`period`] - calendar window arithmetic in the business timezone
//! - [`summary`] - pure reductions over sales records
//! - [`service`] - store-backed entry points

pub mod period;
pub mod service;
pub mod summary;

pub use period::PeriodWindow;
pub use service::Reporter;
pub use summary::{CustomerHistory, compute_summary, staff_performance};
