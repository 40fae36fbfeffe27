//! Wire types for the signing authority

use dtoken_core::{Digest, DigestInput};
use serde::{Deserialize, Serialize};

/// Short-lived bearer token, used for one remote call and then revoked
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw token value for the `Authorization` header
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([redacted])")
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Body of an authentication challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationRequest {
    pub requester_bic: String,
    pub requester_service: String,
    pub user_id: String,
    pub challenge: Digest,
    pub required_security_level: String,
}

/// Body of a signing request
///
/// Fields are forwarded verbatim; absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_bic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<DigestInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_preferred_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_security_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Fields we read out of a status payload
///
/// The payload itself is passed through to the caller unchanged; this is
/// only a view over it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub state: Option<String>,
    pub result: Option<String>,
    pub signature: Option<String>,
    pub certificate: Option<String>,
    pub dn: Option<String>,
}

impl StatusView {
    /// Lenient view: unexpected shapes read as all-empty
    pub fn from_payload(payload: &serde_json::Value) -> Self {
        serde_json::from_value(payload.clone()).unwrap_or_default()
    }

    /// Signature and certificate, when both are present and non-empty
    pub fn signed_result(&self) -> Option<(&str, &str)> {
        match (self.signature.as_deref(), self.certificate.as_deref()) {
            (Some(sig), Some(cert)) if !sig.is_empty() && !cert.is_empty() => Some((sig, cert)),
            _ => None,
        }
    }
}

/// Session id from an authenticate/sign response, if any
pub fn session_id_of(payload: &serde_json::Value) -> Option<&str> {
    payload
        .get("sessionId")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bearer_token_debug_is_redacted() {
        let token = BearerToken::new("very-secret");
        assert!(!format!("{:?}", token).contains("very-secret"));
        assert_eq!(token.secret(), "very-secret");
    }

    #[test]
    fn test_signature_request_omits_absent_fields() {
        let request = SignatureRequest {
            user_id: Some("user1".into()),
            digest: Some(DigestInput::Single("abc=".into())),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"user_id": "user1", "digest": "abc="})
        );
    }

    #[test]
    fn test_status_view_reads_completion() {
        let payload = json!({
            "state": "COMPLETE",
            "result": "OK",
            "signature": "c2ln",
            "certificate": "Y2VydA==",
            "dn": "cn=alice"
        });
        let view = StatusView::from_payload(&payload);
        assert_eq!(view.state.as_deref(), Some("COMPLETE"));
        assert_eq!(view.signed_result(), Some(("c2ln", "Y2VydA==")));
    }

    #[test]
    fn test_status_view_pending_has_no_result() {
        let view = StatusView::from_payload(&json!({"state": "PENDING"}));
        assert_eq!(view.signed_result(), None);

        let view = StatusView::from_payload(&json!({"signature": "c2ln", "certificate": ""}));
        assert_eq!(view.signed_result(), None);
    }

    #[test]
    fn test_status_view_tolerates_unexpected_shape() {
        assert_eq!(StatusView::from_payload(&json!(["not", "an", "object"])), StatusView::default());
        assert_eq!(StatusView::from_payload(&json!({"state": 7})), StatusView::default());
    }

    #[test]
    fn test_session_id_of() {
        assert_eq!(session_id_of(&json!({"sessionId": "S1"})), Some("S1"));
        assert_eq!(session_id_of(&json!({"sessionId": ""})), None);
        assert_eq!(session_id_of(&json!({"error": "nope"})), None);
    }
}
