//! Digital token endpoints: authentication, signature, status
//!
//! Responses are returned as raw JSON so callers can forward them
//! unchanged.

use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::{json_or_rejected, AuthorityClient, DIGITAL_TOKEN_PATH};
use crate::error::{BridgeError, Result};
use crate::types::{AuthenticationRequest, BearerToken, SignatureRequest};

impl AuthorityClient {
    /// Start an authentication challenge
    pub async fn authenticate(
        &self,
        token: &BearerToken,
        request: &AuthenticationRequest,
    ) -> Result<Value> {
        info!(
            user_id = %request.user_id,
            challenge = %request.challenge,
            "Submitting authentication challenge"
        );

        let response = self
            .http
            .post(self.url(&format!("{}/authentication", DIGITAL_TOKEN_PATH)))
            .header(ACCEPT, "application/json")
            .bearer_auth(token.secret())
            .json(request)
            .send()
            .await?;

        let data = json_or_rejected(response).await?;
        debug!(response = %data, "Authentication response");
        Ok(data)
    }

    /// Start a signing request
    pub async fn sign(&self, token: &BearerToken, request: &SignatureRequest) -> Result<Value> {
        info!(
            user_id = ?request.user_id,
            digests = request.digest.as_ref().map(|d| d.len()).unwrap_or(0),
            "Submitting signature request"
        );

        let response = self
            .http
            .post(self.url(&format!("{}/signature", DIGITAL_TOKEN_PATH)))
            .header(ACCEPT, "application/json")
            .bearer_auth(token.secret())
            .json(request)
            .send()
            .await?;

        let data = json_or_rejected(response).await?;
        debug!(response = %data, "Signature response");
        Ok(data)
    }

    /// Fetch the current state of a session
    pub async fn status(&self, token: &BearerToken, session_id: &str) -> Result<Value> {
        let mut url = reqwest::Url::parse(&self.url(DIGITAL_TOKEN_PATH))
            .map_err(|e| BridgeError::InvalidRequest(e.to_string()))?;
        // Pushed as one segment so the id cannot escape the session path
        url.path_segments_mut()
            .map_err(|_| BridgeError::InvalidRequest("base URL cannot carry a path".into()))?
            .push(session_id);

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .bearer_auth(token.secret())
            .send()
            .await?;

        let data = json_or_rejected(response).await?;
        debug!(session_id = %session_id, response = %data, "Status response");
        Ok(data)
    }
}
