//! API error types and responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dtoken_bridge::BridgeError;
use serde::Serialize;
use thiserror::Error;

use crate::core::VerificationReport;
use crate::storage::StorageError;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Backend error getting Oauth token")]
    AuthUnavailable,

    /// Remote HTTP error, forwarded with its status and body
    #[error("Remote service returned {status}")]
    Remote { status: u16, body: String },

    #[error("Remote service unreachable: {0}")]
    Transport(String),

    #[error("Invalid remote response: {0}")]
    BadGateway(String),

    #[error("Client credentials error: {0}")]
    Credentials(String),

    #[error("Signature verification failed")]
    VerificationFailed(VerificationReport),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::Remote { status, body } => return forward_remote(status, body),
            ApiError::AuthUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AUTH_UNAVAILABLE",
                "Backend error getting Oauth token".to_string(),
                None,
            ),
            ApiError::Transport(msg) => (
                StatusCode::BAD_GATEWAY,
                "TRANSPORT_FAILURE",
                msg,
                None,
            ),
            ApiError::BadGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                "INVALID_REMOTE_RESPONSE",
                msg,
                None,
            ),
            ApiError::Credentials(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CREDENTIALS_ERROR",
                msg,
                None,
            ),
            ApiError::VerificationFailed(report) => (
                StatusCode::BAD_GATEWAY,
                "VERIFICATION_FAILED",
                "Signature verification failed".to_string(),
                serde_json::to_value(&report).ok(),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
                None,
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Forward a remote error status and body
///
/// JSON bodies pass through, other text is wrapped as `{"error": text}`,
/// and an empty body becomes `{"error": "<status> Error"}`.
fn forward_remote(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    let payload = if body.trim().is_empty() {
        serde_json::json!({ "error": format!("{} Error", status.as_u16()) })
    } else {
        serde_json::from_str(&body).unwrap_or_else(|_| serde_json::json!({ "error": body }))
    };
    (status, Json(payload)).into_response()
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::AuthUnavailable => ApiError::AuthUnavailable,
            BridgeError::Rejected { status, body } => ApiError::Remote { status, body },
            BridgeError::Transport(msg) => ApiError::Transport(msg),
            BridgeError::InvalidResponse(msg) => ApiError::BadGateway(msg),
            BridgeError::Credentials(e) => ApiError::Credentials(e.to_string()),
            BridgeError::InvalidRequest(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
