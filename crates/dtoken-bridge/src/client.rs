//! Signing authority client
//!
//! One `AuthorityClient` is shared by all requests. It holds no token
//! state: every remote call gets its own bearer token (see `token`).

use dtoken_core::{AssertionBuilder, ClientCredentials};
use reqwest::Response;
use std::sync::Arc;
use tracing::error;

use crate::error::{BridgeError, Result};

/// OAuth token endpoint path
pub const TOKEN_PATH: &str = "/oauth2/v1/token";

/// OAuth revocation endpoint path
pub const REVOKE_PATH: &str = "/oauth2/v1/revoke";

/// Digital token API base path
pub const DIGITAL_TOKEN_PATH: &str = "/swift-token-management/v1/digital-token";

/// Connection settings for the signing authority
#[derive(Clone)]
pub struct AuthorityConfig {
    /// Remote host without scheme; the assertion audience is derived from it
    pub api_host: String,
    /// Base URL for outbound calls (normally `https://{api_host}`)
    pub base_url: String,
    /// OAuth client id, also the assertion issuer
    pub client_id: String,
    pub client_secret: String,
    /// Distinguished name of the client certificate, the assertion subject
    pub certificate_dn: String,
    /// Where the private key and certificate live
    pub credentials: ClientCredentials,
}

impl AuthorityConfig {
    /// Config with `base_url` defaulted to `https://{api_host}`
    pub fn new(
        api_host: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        certificate_dn: impl Into<String>,
        credentials: ClientCredentials,
    ) -> Self {
        let api_host = api_host.into();
        Self {
            base_url: format!("https://{}", api_host),
            api_host,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            certificate_dn: certificate_dn.into(),
            credentials,
        }
    }

    /// Override the outbound base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Audience claim of the client assertion
    pub fn token_audience(&self) -> String {
        format!("{}{}", self.api_host, TOKEN_PATH)
    }
}

impl std::fmt::Debug for AuthorityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityConfig")
            .field("api_host", &self.api_host)
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("certificate_dn", &self.certificate_dn)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// HTTP client for the signing authority
#[derive(Debug, Clone)]
pub struct AuthorityClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: Arc<AuthorityConfig>,
    pub(crate) assertions: AssertionBuilder,
}

impl AuthorityClient {
    pub fn new(config: AuthorityConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies)
    pub fn with_http_client(config: AuthorityConfig, http: reqwest::Client) -> Self {
        let assertions = AssertionBuilder::new(
            config.client_id.clone(),
            config.token_audience(),
            config.certificate_dn.clone(),
        );
        Self {
            http,
            config: Arc::new(config),
            assertions,
        }
    }

    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

/// Pass through a JSON body, or turn a 4xx/5xx into `Rejected`
pub(crate) async fn json_or_rejected(response: Response) -> Result<serde_json::Value> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), body = %body, "Remote service returned an error");
        return Err(BridgeError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthorityConfig {
        AuthorityConfig::new(
            "api.example.com",
            "client-123",
            "s3cret",
            "o=testbic8,o=swift",
            ClientCredentials::new("key.pem", "cert.pem"),
        )
    }

    #[test]
    fn test_default_base_url_is_https_host() {
        let config = config();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.token_audience(), "api.example.com/oauth2/v1/token");
    }

    #[test]
    fn test_base_url_override_keeps_audience() {
        let config = config().with_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.token_audience(), "api.example.com/oauth2/v1/token");

        let client = AuthorityClient::new(config);
        assert_eq!(client.url(TOKEN_PATH), "http://127.0.0.1:8080/oauth2/v1/token");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("s3cret"));
    }
}
