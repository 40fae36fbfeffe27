//! Cross-tool verification tests
//!
//! The signature fixture was produced with
//! `openssl dgst -sha256 -sign testdata/signer.key`, the same primitive a
//! signing device applies to the challenge data.

use dtoken_core::{strip_pem_certificate, verify_signature};

const CERT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/signer.pem"));
const SIGNATURE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/interop.sig"));
const DATA: &str = "XyZ0123456789abcdefghijKLMNOPqrs";

#[test]
fn verify_openssl_signature() {
    let body = strip_pem_certificate(CERT).unwrap();

    let result = verify_signature(SIGNATURE, &body, DATA.as_bytes());
    if let Err(e) = &result {
        eprintln!("Verification failed: {:?}", e);
    }
    assert!(result.expect("certificate should parse"), "OpenSSL signature should verify in Rust");
}

#[test]
fn openssl_signature_rejects_other_data() {
    let body = strip_pem_certificate(CERT).unwrap();
    assert!(!verify_signature(SIGNATURE, &body, b"XyZ0123456789abcdefghijKLMNOPqrt").unwrap());
}
