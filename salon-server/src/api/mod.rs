//! API routes
//!
//! - [`health`] - liveness and database probe
//! - [`appointments`] - bookings, availability, conflict checks
//! - [`customers`] - customer records and search
//! - [`staff`] - staff records, day schedule, performance
//! - [`sales`] - sales records, summary, goals
//! - [`counseling`] - counseling sheets
//! - [`instagram`] - scheduled Instagram posts

pub mod middleware;

pub mod appointments;
pub mod counseling;
pub mod customers;
pub mod health;
pub mod instagram;
pub mod sales;
pub mod staff;

pub use crate::utils::AppResult;
