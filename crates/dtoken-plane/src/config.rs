//! Service configuration from the environment

use dtoken_bridge::AuthorityConfig;
use dtoken_core::ClientCredentials;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::storage::memory::DEFAULT_SESSION_TTL;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// What to do when a completed session fails local verification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerificationMode {
    /// Log the outcome and pass the remote payload through
    #[default]
    Advisory,
    /// Replace the payload with a `VERIFICATION_FAILED` error
    Strict,
}

impl FromStr for VerificationMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(VerificationMode::Advisory),
            "strict" => Ok(VerificationMode::Strict),
            _ => Err(()),
        }
    }
}

/// Fixed requester identity sent with authentication challenges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterIdentity {
    pub bic: String,
    pub service: String,
    pub security_level: String,
}

impl Default for RequesterIdentity {
    fn default() -> Self {
        Self {
            bic: "TESTBIC8".into(),
            service: "Bank App Demo".into(),
            security_level: "EASY".into(),
        }
    }
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub authority: AuthorityConfig,
    pub requester: RequesterIdentity,
    pub verification_mode: VerificationMode,
    pub session_ttl: Duration,
    /// Directory served at `/` when set
    pub static_dir: Option<PathBuf>,
}

impl ServiceConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let credentials = ClientCredentials::new(
            require("SWIFT_PRIVATE_KEY")?,
            require("SWIFT_CERTIFICATE")?,
        );
        let mut authority = AuthorityConfig::new(
            require("SWIFT_API_HOST")?,
            require("CLIENT_ID")?,
            require("CLIENT_SECRET")?,
            require("SWIFT_CERTIFICATE_DN")?,
            credentials,
        );
        if let Some(base_url) = get("SWIFT_API_BASE_URL") {
            authority = authority.with_base_url(base_url);
        }

        let port = parse_or("PORT", get("PORT"), 3000u16)?;
        let verification_mode = parse_or(
            "DTOKEN_VERIFICATION_MODE",
            get("DTOKEN_VERIFICATION_MODE"),
            VerificationMode::default(),
        )?;
        let session_ttl = match get("DTOKEN_SESSION_TTL_SECS") {
            Some(value) => Duration::from_secs(parse_value("DTOKEN_SESSION_TTL_SECS", value)?),
            None => DEFAULT_SESSION_TTL,
        };

        let defaults = RequesterIdentity::default();
        let requester = RequesterIdentity {
            bic: get("DTOKEN_REQUESTER_BIC").unwrap_or(defaults.bic),
            service: get("DTOKEN_REQUESTER_SERVICE").unwrap_or(defaults.service),
            security_level: get("DTOKEN_SECURITY_LEVEL").unwrap_or(defaults.security_level),
        };

        Ok(Self {
            port,
            authority,
            requester,
            verification_mode,
            session_ttl,
            static_dir: get("DTOKEN_STATIC_DIR").map(PathBuf::from),
        })
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

fn parse_or<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => parse_value(name, value),
        None => Ok(default),
    }
}
