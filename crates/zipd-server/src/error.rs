use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use zipd_core::error::ArchiveError;

/// HTTP-facing wrapper for core archive errors.
///
/// Manifest problems are the caller's fault (400), upstream fetch failures
/// are a gateway problem (502), and encoding/task failures are ours (500).
pub struct ApiError(pub ArchiveError);

impl From<ArchiveError> for ApiError {
    fn from(err: ArchiveError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_bad_request() {
            StatusCode::BAD_REQUEST
        } else {
            match self.0 {
                ArchiveError::Fetch { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        };
        (status, self.0.to_string()).into_response()
    }
}
