//! Error types for the relay
//!
//! Every failure a handler can hit maps onto one `AppError` variant, and each
//! variant knows its HTTP status. Failures are logged before the response is
//! emitted.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::relay::RunStatus;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Use POST")]
    MethodNotAllowed,

    #[error("Failed to start workflow run ({status}): {message}")]
    UpstreamStart { status: StatusCode, message: String },

    #[error("Failed to poll workflow run ({status}): {message}")]
    UpstreamPoll { status: StatusCode, message: String },

    #[error("Model API error ({status}): {message}")]
    UpstreamCall { status: StatusCode, message: String },

    #[error("Workflow run {run_id} ended with status {status}{}", detail_suffix(.detail))]
    RunFailed {
        run_id: String,
        status: RunStatus,
        detail: Option<String>,
    },

    #[error("Workflow run {run_id} did not finish within {:.1}s (last status: {status})", .waited.as_secs_f64())]
    UpstreamIncomplete {
        run_id: String,
        /// Last status label as reported upstream
        status: String,
        waited: Duration,
    },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

impl AppError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::UpstreamStart { status, .. } | AppError::UpstreamPoll { status, .. } => {
                *status
            }
            AppError::UpstreamCall { .. }
            | AppError::RunFailed { .. }
            | AppError::UpstreamIncomplete { .. }
            | AppError::HttpError(_)
            | AppError::JsonError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable kind for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::MethodNotAllowed => "method_not_allowed",
            AppError::UpstreamStart { .. } => "upstream_start_failure",
            AppError::UpstreamPoll { .. } => "upstream_poll_failure",
            AppError::UpstreamCall { .. } => "upstream_call_failure",
            AppError::RunFailed { .. } => "run_failed",
            AppError::UpstreamIncomplete { .. } => "upstream_incomplete",
            AppError::HttpError(_) | AppError::JsonError(_) | AppError::Internal(_) => {
                "unexpected"
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        error!(
            status = %status.as_u16(),
            kind = %self.kind(),
            error = %message,
            "Request failed"
        );

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Pull a human-readable message out of an upstream error body.
///
/// Prefers `error.message`, then a string `error`, then `message`, then the
/// raw body.
pub fn upstream_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|v| {
        v.pointer("/error/message")
            .or_else(|| v.get("error").filter(|e| e.is_string()))
            .or_else(|| v.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });

    match from_json {
        Some(message) if !message.trim().is_empty() => message,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}
