//! Web error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use ark_persistence::PersistenceError;

/// Result type for web handlers.
pub type Result<T> = std::result::Result<T, WebError>;

/// Errors surfaced as JSON error responses.
#[derive(Debug, Error)]
pub enum WebError {
    /// Bad request - invalid query or body.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Store read failed.
    #[error("store error: {0}")]
    Store(#[from] PersistenceError),
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
