//! HTTP surface: archive endpoint and liveness probe.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use zipd_core::{archive, fetcher, manifest};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/api/archive", post(archive_handler))
        .with_state(state)
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Builds a ZIP from the posted manifest and streams it back as an
/// attachment. Validating -> Fetching -> Assembling -> Responding; any
/// failure before assembly aborts the request with no partial archive.
async fn archive_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<manifest::ArchiveRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Invalid JSON payload").into_response();
    };

    match build_archive_response(&state, &request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err.0, "archive request failed");
            err.into_response()
        }
    }
}

async fn build_archive_response(
    state: &AppState,
    request: &manifest::ArchiveRequest,
) -> Result<Response, ApiError> {
    let resolved = manifest::resolve(request, &state.config)?;
    tracing::info!(
        files = resolved.entries.len(),
        archive = %resolved.archive_name,
        "archive request accepted"
    );

    let limits = fetcher::FetchLimits {
        max_file_bytes: state.config.max_file_bytes,
        max_total_bytes: state.config.max_total_bytes,
    };
    let fetched = fetcher::fetch_all(
        &state.client,
        &resolved.entries,
        state.config.max_parallel,
        limits,
    )
    .await?;

    let bytes = archive::build_archive(&fetched, state.config.compression_level)?;
    tracing::info!(
        archive = %resolved.archive_name,
        entries = fetched.len(),
        bytes = bytes.len(),
        "archive built"
    );
    Ok(zip_attachment(bytes, &resolved.archive_name))
}

/// 200 response carrying the finished archive as a download attachment.
fn zip_attachment(bytes: Vec<u8>, archive_name: &str) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{archive_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    let len = bytes.len();

    let mut response = Response::new(Body::from(bytes));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/zip"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}
