//! Self-signed client assertion
//!
//! The assertion is a short-lived RS256 JWT proving possession of the
//! client private key. It is exchanged for a bearer token using the
//! `urn:ietf:params:oauth:grant-type:jwt-bearer` grant. The header embeds
//! the client certificate as the only `x5c` entry.

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::certificate::strip_pem_certificate;
use crate::error::{CoreError, Result};

/// Assertion lifetime in seconds
pub const ASSERTION_LIFETIME_SECS: i64 = 700;

const JTI_LENGTH: usize = 12;
const JTI_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Claims carried by the assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub aud: String,
    /// Certificate distinguished name
    pub sub: String,
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

/// Locations of the client key material
///
/// Files are read on every `load()` so a rotated key is picked up without
/// a restart.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    private_key_path: PathBuf,
    certificate_path: PathBuf,
}

impl ClientCredentials {
    pub fn new(private_key_path: impl Into<PathBuf>, certificate_path: impl Into<PathBuf>) -> Self {
        Self {
            private_key_path: private_key_path.into(),
            certificate_path: certificate_path.into(),
        }
    }

    /// Read the PKCS#8 private key and PEM certificate from disk
    pub fn load(&self) -> Result<KeyMaterial> {
        Ok(KeyMaterial {
            private_key_pem: read_file(&self.private_key_path)?,
            certificate_pem: read_file(&self.certificate_path)?,
        })
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Private key and certificate in PEM form
#[derive(Clone)]
pub struct KeyMaterial {
    private_key_pem: String,
    certificate_pem: String,
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("private_key_pem", &"[redacted]")
            .field("certificate_pem", &self.certificate_pem)
            .finish()
    }
}

impl KeyMaterial {
    pub fn new(private_key_pem: impl Into<String>, certificate_pem: impl Into<String>) -> Self {
        Self {
            private_key_pem: private_key_pem.into(),
            certificate_pem: certificate_pem.into(),
        }
    }
}

/// Builds signed client assertions for the token endpoint
#[derive(Debug, Clone)]
pub struct AssertionBuilder {
    issuer: String,
    audience: String,
    subject: String,
}

impl AssertionBuilder {
    /// `issuer` is the client id, `audience` the token endpoint and
    /// `subject` the certificate DN.
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            subject: subject.into(),
        }
    }

    /// Claims for an assertion issued at `now`
    ///
    /// Both timestamps are rounded up to whole seconds.
    pub fn claims_at(&self, now: DateTime<Utc>) -> AssertionClaims {
        let millis = now.timestamp_millis();
        let iat = ceil_seconds(millis);
        let exp = ceil_seconds(millis + ASSERTION_LIFETIME_SECS * 1000);

        AssertionClaims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: self.subject.clone(),
            jti: random_jti(),
            exp,
            iat,
        }
    }

    /// Sign a fresh assertion
    pub fn sign(&self, material: &KeyMaterial) -> Result<String> {
        self.sign_at(material, Utc::now())
    }

    /// Sign an assertion issued at `now`
    pub fn sign_at(&self, material: &KeyMaterial, now: DateTime<Utc>) -> Result<String> {
        let key = EncodingKey::from_rsa_pem(material.private_key_pem.as_bytes())?;
        let x5c = strip_pem_certificate(&material.certificate_pem)?;

        let mut header = Header::new(Algorithm::RS256);
        header.typ = Some("JWT".to_string());
        header.x5c = Some(vec![x5c]);

        let claims = self.claims_at(now);
        let token = encode(&header, &claims, &key)?;

        tracing::debug!(jti = %claims.jti, exp = claims.exp, "Created client assertion");
        Ok(token)
    }
}

fn ceil_seconds(millis: i64) -> i64 {
    millis.div_euclid(1000) + i64::from(millis.rem_euclid(1000) != 0)
}

/// Random 12-character `[a-z0-9]` token identifier
pub fn random_jti() -> String {
    let mut rng = rand::thread_rng();
    (0..JTI_LENGTH)
        .map(|_| JTI_CHARSET[rng.gen_range(0..JTI_CHARSET.len())] as char)
        .collect()
}
