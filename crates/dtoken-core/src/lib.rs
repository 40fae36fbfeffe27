//! # Digital Token Core
//!
//! Cryptographic primitives for the digital token challenge/response flow:
//!
//! - **Assertion**: self-signed RS256 JWT exchanged for a bearer token
//! - **Digest**: base64 SHA-256 of challenge or transaction data
//! - **Certificate**: signer certificate parsing, expiry and signature checks
//!
//! ## Trust Chain
//!
//! 1. A challenge digest is sent to the remote service
//! 2. The user's device signs the data behind the digest
//! 3. The returned signature is verified against the returned certificate
//!    and the data we kept when the challenge was issued

pub mod assertion;
pub mod certificate;
pub mod digest;
pub mod error;
pub mod types;

pub use assertion::{AssertionBuilder, AssertionClaims, ClientCredentials, KeyMaterial};
pub use certificate::{strip_pem_certificate, verify_signature, wrap_certificate, Certificate};
pub use digest::{digest, random_challenge, Challenge};
pub use error::{CoreError, Result};
pub use types::{Digest, DigestInput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
