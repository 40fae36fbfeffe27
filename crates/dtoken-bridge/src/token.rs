//! Bearer token lifecycle
//!
//! Tokens are never cached: each remote call acquires one, uses it once,
//! and revokes it. `with_token` scopes that sequence so revocation runs on
//! every exit path. If the scoped future is dropped before it finishes
//! (client disconnect, cancelled task), the lease revokes from `Drop` on
//! a spawned task.

use reqwest::header::ACCEPT;
use std::future::Future;
use tracing::{debug, error, info, warn};

use crate::client::{AuthorityClient, REVOKE_PATH, TOKEN_PATH};
use crate::error::{BridgeError, Result};
use crate::types::{BearerToken, TokenResponse};

/// OAuth grant type for assertion exchange
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Scope requested with every token
pub const TOKEN_SCOPE: &str = "3skey";

impl AuthorityClient {
    /// Exchange a fresh client assertion for a bearer token
    ///
    /// Returns `Ok(None)` when the token endpoint answers 4xx/5xx. Key
    /// material and transport failures are errors.
    pub async fn acquire_token(&self) -> Result<Option<BearerToken>> {
        let material = self.config.credentials.load()?;
        let assertion = self.assertions.sign(&material)?;

        let response = self
            .http
            .post(self.url(TOKEN_PATH))
            .header("X-SRCNW", "INTERNET")
            .header(ACCEPT, "application/json")
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
                ("scope", TOKEN_SCOPE),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Token request rejected");
            return Ok(None);
        }

        let token: TokenResponse = response.json().await?;
        debug!("Bearer token acquired");
        Ok(Some(BearerToken::new(token.access_token)))
    }

    /// Revoke a bearer token
    ///
    /// A 4xx/5xx answer is logged and treated as done.
    pub async fn revoke_token(&self, token: &BearerToken) -> Result<()> {
        let response = self
            .http
            .post(self.url(REVOKE_PATH))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("token", token.secret())])
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Token revocation rejected");
            return Ok(());
        }

        info!("Token deleted");
        Ok(())
    }

    /// Acquire a token wrapped in a lease that revokes it when released
    pub async fn lease_token(&self) -> Result<TokenLease> {
        let token = self
            .acquire_token()
            .await?
            .ok_or(BridgeError::AuthUnavailable)?;

        Ok(TokenLease {
            client: self.clone(),
            token,
            armed: true,
        })
    }

    /// Run `f` with a fresh token, revoking it afterwards
    ///
    /// `f` is not called when no token could be acquired. The outcome of
    /// `f` is returned even if revocation fails.
    pub async fn with_token<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: FnOnce(BearerToken) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let lease = self.lease_token().await?;
        let outcome = f(lease.token().clone()).await;
        lease.release().await;
        outcome
    }
}

/// A bearer token that must be revoked
///
/// Call `release` to revoke in place. Dropping an unreleased lease spawns
/// the revocation on the current Tokio runtime.
#[derive(Debug)]
pub struct TokenLease {
    client: AuthorityClient,
    token: BearerToken,
    armed: bool,
}

impl TokenLease {
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Revoke now; failures are logged, never returned
    pub async fn release(mut self) {
        self.armed = false;
        revoke_logged(&self.client, &self.token).await;
    }
}

impl Drop for TokenLease {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let client = self.client.clone();
                let token = self.token.clone();
                warn!("Token lease dropped before release, revoking in background");
                handle.spawn(async move {
                    revoke_logged(&client, &token).await;
                });
            }
            Err(_) => {
                error!("Token lease dropped outside a runtime, token not revoked");
            }
        }
    }
}

async fn revoke_logged(client: &AuthorityClient, token: &BearerToken) {
    if let Err(e) = client.revoke_token(token).await {
        warn!(error = %e, "Token revocation failed");
    }
}
