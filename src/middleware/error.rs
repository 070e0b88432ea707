//! Error response formatting
//!
//! Provides standardized error responses with consistent JSON structure,
//! HTTP status codes, error codes, and user-friendly messages.

use crate::bakong::error::{BakongError, ErrorCode};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Standardized error response structure
///
/// This is returned to clients for all error cases, ensuring
/// consistent error handling across the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Request ID for debugging and support
    pub request_id: Option<String>,

    /// ISO 8601 timestamp of the error
    pub timestamp: String,

    /// Optional additional details (e.g., the upstream status and body)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// Whether the client should retry the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl ErrorResponse {
    pub fn from_error(error: &BakongError, request_id: Option<String>) -> Self {
        Self {
            error: error.error_code(),
            message: error.user_message(),
            request_id,
            timestamp: Utc::now().to_rfc3339(),
            details: error_details(error),
            retryable: Some(error.is_retryable()),
        }
    }
}

/// Upstream status and body are preserved for diagnostics; no other variant
/// leaks raw upstream content to the client.
fn error_details(error: &BakongError) -> Option<serde_json::Value> {
    match error {
        BakongError::UpstreamRejected { status, body } => Some(serde_json::json!({
            "upstream_status": status,
            "upstream_body": body,
        })),
        BakongError::InvalidRequest {
            field: Some(field), ..
        } => Some(serde_json::json!({ "field": field })),
        _ => None,
    }
}

/// Map a `BakongError` into an HTTP response pair, logging it with the
/// severity its status class deserves.
pub fn error_response(
    error: &BakongError,
    request_id: Option<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::from_u16(error.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        tracing::error!(
            error = ?error,
            request_id = ?request_id,
            status = %status.as_u16(),
            "Server error occurred"
        );
    } else {
        tracing::warn!(
            error = ?error,
            request_id = ?request_id,
            status = %status.as_u16(),
            "Client error occurred"
        );
    }

    (status, Json(ErrorResponse::from_error(error, request_id)))
}

/// Pull the request id injected by the request-id middleware, if any.
pub fn get_request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}
