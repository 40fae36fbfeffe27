//! Certificate handling and signature verification
//!
//! The remote service returns the signer certificate as a bare base64
//! body (no PEM delimiters) and the signature as base64 RSASSA-PKCS1-v1_5
//! over SHA-256. Revocation checking is not performed here.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha2::Sha256;
use tracing::{info, warn};
use x509_parser::pem::parse_x509_pem;

use crate::error::{CoreError, Result};

/// PEM header for certificates
pub const CERT_HEADER: &str = "-----BEGIN CERTIFICATE-----";

/// PEM footer for certificates
pub const CERT_FOOTER: &str = "-----END CERTIFICATE-----";

/// Strip PEM delimiters and line breaks, returning the base64 body
///
/// Fails with `MalformedCertificate` when the header or footer is absent.
pub fn strip_pem_certificate(pem: &str) -> Result<String> {
    let rest = pem.strip_prefix(CERT_HEADER).ok_or_else(|| {
        CoreError::MalformedCertificate(format!(
            "certificate is missing the header '{}'",
            CERT_HEADER
        ))
    })?;

    let flattened: String = rest.chars().filter(|c| *c != '\n' && *c != '\r').collect();

    let body = flattened.strip_suffix(CERT_FOOTER).ok_or_else(|| {
        CoreError::MalformedCertificate(format!(
            "certificate is missing the footer '{}'",
            CERT_FOOTER
        ))
    })?;

    Ok(body.to_string())
}

/// Wrap a bare certificate body in PEM delimiters
pub fn wrap_certificate(body: &str) -> String {
    format!("{}\n{}\n{}", CERT_HEADER, body, CERT_FOOTER)
}

/// Parsed signer certificate
#[derive(Debug, Clone)]
pub struct Certificate {
    subject: String,
    valid_to: DateTime<Utc>,
    /// DER-encoded SubjectPublicKeyInfo
    spki: Vec<u8>,
}

impl Certificate {
    /// Parse a bare base64 body as returned by the remote service
    pub fn from_body(body: &str) -> Result<Self> {
        Self::from_pem(&wrap_certificate(body.trim()))
    }

    /// Parse a full PEM certificate
    pub fn from_pem(pem: &str) -> Result<Self> {
        let (_, pem) = parse_x509_pem(pem.as_bytes())
            .map_err(|e| CoreError::InvalidCertificate(e.to_string()))?;
        let cert = pem
            .parse_x509()
            .map_err(|e| CoreError::InvalidCertificate(e.to_string()))?;

        let not_after = cert.validity().not_after.timestamp();
        let valid_to = DateTime::from_timestamp(not_after, 0).ok_or_else(|| {
            CoreError::InvalidCertificate(format!("validTo out of range: {}", not_after))
        })?;

        Ok(Self {
            subject: cert.subject().to_string(),
            valid_to,
            spki: cert.public_key().raw.to_vec(),
        })
    }

    /// Subject distinguished name
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// End of the validity period
    pub fn valid_to(&self) -> DateTime<Utc> {
        self.valid_to
    }

    /// Expired only once `now` is strictly past `valid_to`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_to
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against the current time, logging the outcome
    pub fn check_expiration(&self) -> bool {
        self.check_expiration_at(Utc::now())
    }

    /// Check expiry at `now`, logging the outcome
    pub fn check_expiration_at(&self, now: DateTime<Utc>) -> bool {
        let expired = self.is_expired_at(now);
        if expired {
            warn!(subject = %self.subject, valid_to = %self.valid_to, "Certificate has expired");
        } else {
            info!(valid_to = %self.valid_to, "Certificate is still valid");
        }
        expired
    }

    /// RSA public key carried by the certificate
    pub fn rsa_public_key(&self) -> Result<RsaPublicKey> {
        RsaPublicKey::from_public_key_der(&self.spki).map_err(|e| {
            CoreError::UnsupportedKey(format!("certificate key is not RSA: {}", e))
        })
    }

    /// Verify a base64 RSA-SHA256 signature over `data`
    ///
    /// An undecodable or mismatching signature is `Ok(false)`; only a
    /// certificate key we cannot use is an error.
    pub fn verify(&self, signature_b64: &str, data: &[u8]) -> Result<bool> {
        let verifying_key = VerifyingKey::<Sha256>::new(self.rsa_public_key()?);

        let compact: String = signature_b64.chars().filter(|c| !c.is_whitespace()).collect();
        let Ok(signature_bytes) = STANDARD.decode(compact) else {
            return Ok(false);
        };
        let Ok(signature) = Signature::try_from(signature_bytes.as_slice()) else {
            return Ok(false);
        };

        Ok(verifying_key.verify(data, &signature).is_ok())
    }
}

/// Verify `signature_b64` over `data` against a bare certificate body
pub fn verify_signature(signature_b64: &str, certificate_body: &str, data: &[u8]) -> Result<bool> {
    let certificate = Certificate::from_body(certificate_body)?;
    let valid = certificate.verify(signature_b64, data)?;

    if valid {
        info!(subject = %certificate.subject(), "Signature is valid");
    } else {
        warn!(subject = %certificate.subject(), "Signature is invalid");
    }

    Ok(valid)
}
