//! Verification of completed sessions
//!
//! When the remote service reports a session as complete it returns the
//! signature and the signer's certificate. Before trusting that result we
//! check the certificate's expiry and verify the signature against the
//! data we kept when the challenge was issued.

use chrono::{DateTime, Utc};
use dtoken_core::{verify_signature, Certificate};
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::storage::SessionRecord;

/// Outcome of the signature check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureCheck {
    Valid,
    Invalid,
    /// The data behind the digest is unknown, nothing to check against
    Unverifiable,
}

/// Result of checking a completed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub session_id: String,
    /// `None` when the certificate could not be parsed
    pub certificate_expired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_valid_to: Option<DateTime<Utc>>,
    pub signature: SignatureCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationReport {
    /// Certificate parsed and unexpired, signature not invalid
    ///
    /// An unverifiable signature passes: an opaque digest has no known
    /// preimage.
    pub fn passed(&self) -> bool {
        self.error.is_none()
            && self.certificate_expired == Some(false)
            && self.signature != SignatureCheck::Invalid
    }
}

/// Check a completed session's certificate and signature at `now`
pub fn verify_completion(
    session_id: &str,
    record: &SessionRecord,
    signature_b64: &str,
    certificate_body: &str,
    now: DateTime<Utc>,
) -> VerificationReport {
    let _span = info_span!("verify_completion", session_id = %session_id).entered();

    let unchecked = if record.provenance_data.is_some() {
        SignatureCheck::Invalid
    } else {
        SignatureCheck::Unverifiable
    };

    let certificate = match Certificate::from_body(certificate_body) {
        Ok(certificate) => certificate,
        Err(e) => {
            warn!(error = %e, "Cannot parse signer certificate");
            return VerificationReport {
                session_id: session_id.to_string(),
                certificate_expired: None,
                certificate_valid_to: None,
                signature: unchecked,
                error: Some(e.to_string()),
            };
        }
    };

    // Expiry is reported, it does not skip the signature check
    let expired = certificate.check_expiration_at(now);

    let mut error = None;
    let signature = match record.provenance_data.as_deref() {
        None => {
            info!("Data behind the digest is unknown, cannot verify signature");
            SignatureCheck::Unverifiable
        }
        Some(data) => match verify_signature(signature_b64, certificate_body, data.as_bytes()) {
            Ok(true) => SignatureCheck::Valid,
            Ok(false) => SignatureCheck::Invalid,
            Err(e) => {
                warn!(error = %e, "Cannot verify signature");
                error = Some(e.to_string());
                SignatureCheck::Invalid
            }
        },
    };

    VerificationReport {
        session_id: session_id.to_string(),
        certificate_expired: Some(expired),
        certificate_valid_to: Some(certificate.valid_to()),
        signature,
        error,
    }
}
