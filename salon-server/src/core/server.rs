//! HTTP server startup and shutdown

use std::time::Duration;

use axum::Router;
use axum::middleware;
use http::HeaderName;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, ServerState};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::health::router())
        .merge(api::appointments::router())
        .merge(api::customers::router())
        .merge(api::staff::router())
        .merge(api::sales::router())
        .merge(api::counseling::router())
        .merge(api::instagram::router())
}

/// Build the fully configured application with middleware and state
///
/// Used by the HTTP server and by the router tests.
pub fn build_app(state: ServerState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_router()
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(api::middleware::log_request))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Serve until Ctrl-C
    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "Salon server listening");

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, build_app(state))
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
