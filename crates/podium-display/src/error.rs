//! Error types for the display server.
//!
//! [`DisplayError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use podium_core::schedule::ScheduleError;

/// Errors that can occur in the display API layer.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request is well-formed but cannot be applied.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),
}

impl From<ScheduleError> for DisplayError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::EventNotFound(_) => Self::NotFound(err.to_string()),
            ScheduleError::NotARotation(_) => Self::InvalidRequest(err.to_string()),
        }
    }
}

impl DisplayError {
    /// HTTP status this error maps to.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) | Self::InvalidUuid(_) => StatusCode::BAD_REQUEST,
            Self::Serialization(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DisplayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Request failed");
        }
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}
