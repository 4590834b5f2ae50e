//! Gateway Server
//!
//! HTTP server exposing service status checks.

mod handlers;
pub mod logging_middleware;

pub use handlers::{ErrorResponse, HealthResponse, DASHBOARD_PATH};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::services::StatusService;

/// Gateway server configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl GatewayConfig {
    /// Get the socket address
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

/// Build the status API router.
pub fn build_router(status_service: Arc<StatusService>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route(DASHBOARD_PATH, get(handlers::dashboard))
        .route("/health", get(handlers::health))
        .route("/status/{name}", get(handlers::status))
        .route("/all", get(handlers::all))
        .route("/reload", get(handlers::reload))
        .with_state(status_service)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(
            logging_middleware::http_logging_middleware,
        ))
}

/// Status API server
pub struct GatewayServer {
    config: GatewayConfig,
    status_service: Arc<StatusService>,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, status_service: Arc<StatusService>) -> Self {
        Self {
            config,
            status_service,
        }
    }

    /// Bind and serve until the listener fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.addr()?;
        info!("[Gateway] Starting on {}", addr);

        let router = build_router(self.status_service.clone());
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("[Gateway] Ready to accept connections");
        axum::serve(listener, router).await?;

        Ok(())
    }

    /// Start the server in the background
    pub fn spawn(self) -> tokio::task::JoinHandle<anyhow::Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
