//! Error types for the Bee auth proxy.
//!
//! [`UpstreamError`] covers every way the outbound login call can fail and
//! implements [`axum::response::IntoResponse`] so handlers can return
//! `Result<…, UpstreamError>` directly. The caller only ever sees a fixed
//! message; the detail stays in the server log.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Message returned to the browser for any upstream failure.
pub const AUTH_FAILED_MESSAGE: &str = "Failed to authenticate";

/// Failures of the outbound call to the Bee login endpoint.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Connection, TLS or timeout failure.
    #[error("failed to reach auth service: {0}")]
    Transport(#[from] reqwest::Error),

    /// The auth service answered with a non-2xx status.
    #[error("auth service returned {0}")]
    Status(StatusCode),

    /// The auth service answered 2xx but the body is not JSON.
    #[error("auth service returned malformed JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "auth error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": AUTH_FAILED_MESSAGE })),
        )
            .into_response()
    }
}
