//! Error types for the signing authority client

use thiserror::Error;

/// Result type for authority client operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while talking to the signing authority
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Token endpoint answered 4xx/5xx, no bearer token available
    #[error("Backend error getting Oauth token")]
    AuthUnavailable,

    /// Remote service answered with an HTTP error status
    #[error("Remote service rejected the request with status {status}")]
    Rejected { status: u16, body: String },

    /// No response reached us (DNS, connect, TLS, timeout)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Outbound request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response arrived but could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Key or certificate material could not be used
    #[error("Client credentials error: {0}")]
    Credentials(#[from] dtoken_core::CoreError),
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BridgeError::InvalidResponse(err.to_string())
        } else {
            BridgeError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::InvalidResponse(err.to_string())
    }
}
