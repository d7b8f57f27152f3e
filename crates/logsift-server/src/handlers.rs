// HTTP request handlers
//
// Implements log file ingestion, top-error retrieval and health checks

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics::{counter, histogram};
use serde_json::json;
use tracing::{debug, info, warn};

use logsift_core::{aggregate, parse_lines};
use logsift_storage::{scan_top_error, upload_partitions, ScanError};

use crate::{AppError, AppState};

/// Multipart form field carrying the uploaded log file.
const UPLOAD_FIELD: &str = "sample-file";

/// POST /upload - aggregate a raw log file into hourly partitions
pub(crate) async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let start = Instant::now();
    counter!("ingest.requests", 1);

    let contents = read_upload_field(multipart).await?;
    debug!("Received log upload ({} bytes)", contents.len());

    let entries = parse_lines(&contents).map_err(|e| {
        AppError::with_status(
            StatusCode::BAD_REQUEST,
            anyhow::Error::new(e).context("Failed to parse log file"),
        )
    })?;
    let line_count = entries.len();
    counter!("ingest.lines", line_count as u64);

    let partitions = aggregate(entries);
    let written = upload_partitions(&state.store, &partitions)
        .await
        .map_err(|e| {
            AppError::with_status(
                StatusCode::BAD_GATEWAY,
                anyhow::Error::new(e).context("Failed to upload partitions"),
            )
        })?;

    counter!("ingest.partitions", written.len() as u64);
    histogram!("ingest.latency_ms", start.elapsed().as_secs_f64() * 1000.0);
    info!(
        lines = line_count,
        partitions = written.len(),
        "uploaded aggregates"
    );

    let response = Json(json!({
        "status": "ok",
        "lines": line_count,
        "partitions": written,
    }));

    Ok((StatusCode::OK, response).into_response())
}

/// Pull the log file text out of the multipart form.
async fn read_upload_field(mut multipart: Multipart) -> Result<String, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_status(
            StatusCode::BAD_REQUEST,
            anyhow::anyhow!("invalid multipart body: {}", e),
        )
    })? {
        if field.name() == Some(UPLOAD_FIELD) {
            return field.text().await.map_err(|e| {
                AppError::with_status(
                    StatusCode::BAD_REQUEST,
                    anyhow::anyhow!("failed to read {:?} field: {}", UPLOAD_FIELD, e),
                )
            });
        }
    }

    Err(AppError::with_status(
        StatusCode::BAD_REQUEST,
        anyhow::anyhow!("missing {:?} form field", UPLOAD_FIELD),
    ))
}

/// GET /top-error - most frequent message across persisted partitions
pub(crate) async fn handle_top_error(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    counter!("scan.requests", 1);

    let top = match scan_top_error(&state.store).await {
        Ok(top) => top,
        Err(e @ ScanError::Store(_)) => {
            return Err(AppError::with_status(
                StatusCode::BAD_GATEWAY,
                anyhow::Error::new(e).context("Failed to scan aggregate store"),
            ))
        }
        Err(e) => {
            return Err(AppError::with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                anyhow::Error::new(e).context("Failed to reduce partitions"),
            ))
        }
    };

    if top.is_none() {
        debug!("top-error scan found no data");
    }

    Ok((StatusCode::OK, Json(top)).into_response())
}

/// GET /health - Basic health check
pub(crate) async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "healthy"})))
}

/// GET /ready - Readiness check (includes storage connectivity)
pub(crate) async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list("").await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({"status": "ready", "storage": "connected"})),
        ),
        Err(e) => {
            warn!("Storage readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(
                    json!({"status": "not ready", "storage": "disconnected", "error": e.to_string()}),
                ),
            )
        }
    }
}
