//! Signing request handler

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use dtoken_bridge::{session_id_of, SignatureRequest};
use dtoken_core::DigestInput;

use super::AppState;
use crate::api::error::ApiError;
use crate::storage::SessionRecord;

/// Request to sign one digest or a batch of digests
///
/// Every field is forwarded to the remote service as given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub requester_bic: Option<String>,
    pub requester_service: Option<String>,
    pub user_id: Option<String>,
    pub digest: Option<DigestInput>,
    pub digest_alg: Option<String>,
    pub user_preferred_method: Option<String>,
    pub required_security_level: Option<String>,
    pub message: Option<String>,
}

impl From<SignRequest> for SignatureRequest {
    fn from(request: SignRequest) -> Self {
        SignatureRequest {
            requester_bic: request.requester_bic,
            requester_service: request.requester_service,
            user_id: request.user_id,
            digest: request.digest,
            digest_algorithm: request.digest_alg,
            user_preferred_method: request.user_preferred_method,
            required_security_level: request.required_security_level,
            message: request.message,
        }
    }
}

/// Start a signing request
///
/// POST /api/sign
///
/// The message is kept for later verification only when it hashes to the
/// single supplied digest. Otherwise the digest is opaque to us and the
/// returned signature cannot be checked.
pub async fn sign(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignRequest>,
) -> Result<Json<Value>, ApiError> {
    let record = SessionRecord::signature(request.digest.clone(), request.message.as_deref());
    info!(
        user_id = ?request.user_id,
        digests = request.digest.as_ref().map(|d| d.len()).unwrap_or(0),
        verifiable = record.provenance_data.is_some(),
        "Signature requested"
    );
    if record.provenance_data.is_none() {
        info!("Message does not hash to the supplied digest, signature will not be verifiable");
    }

    let body = SignatureRequest::from(request);
    let client = state.client.clone();
    let data = state
        .client
        .with_token(|token| async move { client.sign(&token, &body).await })
        .await?;

    match session_id_of(&data) {
        Some(session_id) => state.store.record(session_id, record).await?,
        None => warn!("Signature response carried no session id"),
    }

    Ok(Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sign_request_maps_field_names() {
        let request: SignRequest = serde_json::from_value(json!({
            "requesterBic": "TESTBIC8",
            "requesterService": "Bank App Demo",
            "userId": "user1",
            "digest": "abc=",
            "digestAlg": "SHA-256",
            "userPreferredMethod": "PUSH",
            "requiredSecurityLevel": "STRONG",
            "message": "hello"
        }))
        .unwrap();

        let outbound = serde_json::to_value(SignatureRequest::from(request)).unwrap();
        assert_eq!(
            outbound,
            json!({
                "requester_bic": "TESTBIC8",
                "requester_service": "Bank App Demo",
                "user_id": "user1",
                "digest": "abc=",
                "digest_algorithm": "SHA-256",
                "user_preferred_method": "PUSH",
                "required_security_level": "STRONG",
                "message": "hello"
            })
        );
    }

    #[test]
    fn test_sign_request_accepts_digest_batch() {
        let request: SignRequest =
            serde_json::from_value(json!({"userId": "user1", "digest": ["a=", "b="]})).unwrap();
        assert_eq!(request.digest.map(|d| d.len()), Some(2));
    }
}
