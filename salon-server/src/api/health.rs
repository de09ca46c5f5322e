//! Health check route
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /health | GET | liveness plus a database round trip |
//!
//! ```json
//! { "status": "healthy", "version": "0.1.0", "database": { "status": "ok", "latency_ms": 0 } }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    database: CheckResult,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    latency_ms: Option<u64>,
    message: Option<String>,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let started = std::time::Instant::now();
    let database = match state.ping().await {
        Ok(()) => CheckResult {
            status: "ok",
            latency_ms: Some(started.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => CheckResult {
            status: "error",
            latency_ms: None,
            message: Some(e.message),
        },
    };

    Json(HealthResponse {
        status: if database.status == "ok" { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
