//! Signature and certificate verification tests
//!
//! Fixtures share one RSA-2048 key:
//! - `signer.pem` is valid until 2099-12-31T23:59:59Z
//! - `expired.pem` expired at 2021-01-01T00:00:00Z

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, TimeZone, Utc};
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;

use dtoken_core::{
    digest, random_challenge, strip_pem_certificate, verify_signature, Certificate, CoreError,
};

const KEY: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/signer.key"));
const CERT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/signer.pem"));
const EXPIRED_CERT: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/expired.pem"));

// =============================================================================
// Test Helpers
// =============================================================================

fn sign(data: &[u8]) -> Vec<u8> {
    let key = RsaPrivateKey::from_pkcs8_pem(KEY).expect("fixture key");
    let signing_key = SigningKey::<Sha256>::new(key);
    signing_key.sign(data).to_vec()
}

fn cert_body(pem: &str) -> String {
    strip_pem_certificate(pem).expect("fixture certificate")
}

// =============================================================================
// Signature Tests
// =============================================================================

#[test]
fn test_valid_signature_verifies() {
    let data = b"transfer 100 EUR to BE71096123456769";
    let signature = STANDARD.encode(sign(data));

    assert!(verify_signature(&signature, &cert_body(CERT), data).unwrap());
}

#[test]
fn test_random_challenge_signature_verifies() {
    let challenge = random_challenge();
    assert_eq!(challenge.digest, digest(&challenge.data));

    let signature = STANDARD.encode(sign(challenge.data.as_bytes()));
    assert!(verify_signature(&signature, &cert_body(CERT), challenge.data.as_bytes()).unwrap());
}

#[test]
fn test_mutated_data_fails() {
    let data = b"transfer 100 EUR to BE71096123456769".to_vec();
    let signature = STANDARD.encode(sign(&data));
    let body = cert_body(CERT);

    for i in [0, data.len() / 2, data.len() - 1] {
        let mut tampered = data.clone();
        tampered[i] ^= 0x01;
        assert!(
            !verify_signature(&signature, &body, &tampered).unwrap(),
            "byte {} flipped must fail verification",
            i
        );
    }
}

#[test]
fn test_mutated_signature_fails() {
    let data = b"approve login";
    let signature = sign(data);
    let body = cert_body(CERT);

    for i in [0, signature.len() / 2, signature.len() - 1] {
        let mut tampered = signature.clone();
        tampered[i] ^= 0x80;
        assert!(!verify_signature(&STANDARD.encode(&tampered), &body, data).unwrap());
    }
}

#[test]
fn test_undecodable_signature_is_false() {
    assert!(!verify_signature("%%% not base64 %%%", &cert_body(CERT), b"data").unwrap());
    assert!(!verify_signature("", &cert_body(CERT), b"data").unwrap());
}

#[test]
fn test_invalid_certificate_is_error() {
    let result = verify_signature("AAAA", "AAAA", b"data");
    assert!(matches!(result, Err(CoreError::InvalidCertificate(_))));
}

#[test]
fn test_certificate_body_with_line_breaks_parses() {
    let body_with_breaks = CERT
        .trim()
        .trim_start_matches("-----BEGIN CERTIFICATE-----")
        .trim_end_matches("-----END CERTIFICATE-----")
        .trim()
        .to_string();

    let certificate = Certificate::from_body(&body_with_breaks).unwrap();
    assert!(certificate.subject().contains("signer.demo"));
}

// =============================================================================
// Expiry Tests
// =============================================================================

#[test]
fn test_current_certificate_not_expired() {
    let certificate = Certificate::from_body(&cert_body(CERT)).unwrap();
    assert!(!certificate.check_expiration());
    assert_eq!(
        certificate.valid_to(),
        Utc.with_ymd_and_hms(2099, 12, 31, 23, 59, 59).unwrap()
    );
}

#[test]
fn test_past_certificate_expired() {
    let certificate = Certificate::from_body(&cert_body(EXPIRED_CERT)).unwrap();
    assert!(certificate.check_expiration());
}

#[test]
fn test_expiry_boundary_is_exclusive() {
    let certificate = Certificate::from_body(&cert_body(EXPIRED_CERT)).unwrap();
    let valid_to = certificate.valid_to();
    assert_eq!(valid_to, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());

    assert!(!certificate.is_expired_at(valid_to - Duration::seconds(1)));
    assert!(!certificate.is_expired_at(valid_to));
    assert!(certificate.is_expired_at(valid_to + Duration::seconds(1)));
}

#[test]
fn test_expiry_checks_agree_with_clock() {
    let current = Certificate::from_body(&cert_body(CERT)).unwrap();
    let expired = Certificate::from_body(&cert_body(EXPIRED_CERT)).unwrap();

    assert!(!current.is_expired());
    assert!(expired.is_expired());

    let before_expiry = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
    assert!(!expired.check_expiration_at(before_expiry));
    assert!(expired.check_expiration_at(expired.valid_to() + Duration::seconds(1)));
}

#[test]
fn test_expired_certificate_still_verifies_signature() {
    // Expiry and signature checks are independent
    let data = b"late result";
    let signature = STANDARD.encode(sign(data));
    assert!(verify_signature(&signature, &cert_body(EXPIRED_CERT), data).unwrap());
}
