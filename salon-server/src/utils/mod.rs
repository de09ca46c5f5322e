//! Utility module - shared helpers and error re-exports
//!
//! - [`AppError`] / [`AppResult`] - application error type (from shared::error)
//! - [`logger`] - tracing setup
//! - [`time`] - business timezone conversions
//! - [`validation`] - input length and range checks

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
