// HTTP service for log aggregation
//
// - Axum HTTP server (HTTP/1.1, HTTP/2)
// - Multi-backend blob storage (S3, filesystem, in-memory)
// - Structured logging with tracing
// - Graceful shutdown

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use logsift_config::RuntimeConfig;
use logsift_storage::BlobStore;
use serde_json::json;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod handlers;
mod init;

use handlers::{handle_top_error, handle_upload, health_check, ready_check};
use init::{init_store, init_tracing};

/// Application state shared across all requests
#[derive(Clone)]
pub(crate) struct AppState {
    pub store: Arc<BlobStore>,
}

/// Error type that implements IntoResponse
pub(crate) struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {:?}", self.error);
        (
            self.status,
            Json(json!({
                "error": self.error.to_string(),
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
        }
    }
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }
}

/// Build the application router around a blob store.
pub fn router(store: Arc<BlobStore>, max_payload_bytes: usize) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/upload", post(handle_upload))
        .route("/top-error", get(handle_top_error))
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .layer(DefaultBodyLimit::max(max_payload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}

/// Entry point: serve the configured store over HTTP until shutdown.
pub async fn run_with_config(config: RuntimeConfig) -> Result<()> {
    init_tracing(&config);

    let store = init_store(&config)?;
    let max_payload_bytes = config.request.max_payload_bytes;
    info!("Max payload size set to {} bytes", max_payload_bytes);

    let app = router(store, max_payload_bytes);

    let addr = config.server.listen_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to {}", addr))?;

    info!("logsift HTTP endpoint listening on http://{}", addr);
    info!("Routes:");
    info!("  POST http://{}/upload    - log file ingestion", addr);
    info!("  GET  http://{}/top-error - most frequent message", addr);
    info!("  GET  http://{}/health    - health check", addr);
    info!("  GET  http://{}/ready     - readiness check", addr);
    info!("Press Ctrl+C or send SIGTERM to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");

    Ok(())
}
