//! Authentication challenge handler
//!
//! Sends a random challenge digest to the remote service for the user to
//! sign, and remembers the random data so the signature can be checked
//! when the session completes.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use dtoken_bridge::{session_id_of, AuthenticationRequest};
use dtoken_core::random_challenge;

use super::AppState;
use crate::api::error::ApiError;
use crate::storage::SessionRecord;

/// Request to authenticate a user
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub user_id: String,
}

/// Start an authentication challenge
///
/// POST /api/auth
///
/// Returns the remote response unchanged, typically
/// `{state: "PENDING", sessionId, verificationCode}`.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthRequest>,
) -> Result<Json<Value>, ApiError> {
    info!(user_id = %request.user_id, "Authentication requested");

    let challenge = random_challenge();
    let body = AuthenticationRequest {
        requester_bic: state.requester.bic.clone(),
        requester_service: state.requester.service.clone(),
        user_id: request.user_id,
        challenge: challenge.digest.clone(),
        required_security_level: state.requester.security_level.clone(),
    };

    let client = state.client.clone();
    let data = state
        .client
        .with_token(|token| async move { client.authenticate(&token, &body).await })
        .await?;

    match session_id_of(&data) {
        Some(session_id) => {
            state
                .store
                .record(session_id, SessionRecord::authentication(challenge))
                .await?;
        }
        None => warn!("Authentication response carried no session id"),
    }

    Ok(Json(data))
}
