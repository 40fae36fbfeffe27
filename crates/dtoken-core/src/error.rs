//! Error types for the digital token primitives

use thiserror::Error;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while building assertions or verifying results
#[derive(Error, Debug)]
pub enum CoreError {
    /// PEM certificate is missing its header or footer
    #[error("Malformed certificate: {0}")]
    MalformedCertificate(String),

    /// Certificate could not be parsed as X.509
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Private or public key could not be decoded
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Certificate carries a key type we cannot verify with
    #[error("Unsupported key: {0}")]
    UnsupportedKey(String),

    /// Key or certificate file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Assertion signing failed
    #[error("JWT error: {0}")]
    Jwt(String),
}

impl From<jsonwebtoken::errors::Error> for CoreError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::InvalidKeyFormat | ErrorKind::InvalidRsaKey(_) => {
                CoreError::InvalidKey(err.to_string())
            }
            _ => CoreError::Jwt(err.to_string()),
        }
    }
}

impl From<rsa::pkcs8::spki::Error> for CoreError {
    fn from(err: rsa::pkcs8::spki::Error) -> Self {
        CoreError::InvalidKey(err.to_string())
    }
}
