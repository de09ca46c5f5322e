//! Core - server configuration, state and startup
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - shared handler state
//! - [`Server`] - HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
