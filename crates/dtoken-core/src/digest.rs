//! Digest and challenge generation
//!
//! Digests are SHA-256 over the raw bytes, standard base64 with padding.
//! This is the encoding the remote service expects for `challenge` and
//! `digest` fields.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest as _, Sha256};

use crate::types::Digest;

/// Length of the random string behind an authentication challenge
pub const CHALLENGE_LENGTH: usize = 32;

/// Compute the base64 SHA-256 digest of `data`
pub fn digest(data: impl AsRef<[u8]>) -> Digest {
    let hash = Sha256::digest(data.as_ref());
    Digest::new(STANDARD.encode(hash))
}

/// Whether `digest(data)` equals `expected`
pub fn matches(data: impl AsRef<[u8]>, expected: &Digest) -> bool {
    digest(data) == *expected
}

/// Random challenge together with the data it was derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub digest: Digest,
    pub data: String,
}

/// Generate a fresh challenge from 32 random `[A-Za-z0-9]` characters
pub fn random_challenge() -> Challenge {
    let data = random_alphanumeric(CHALLENGE_LENGTH);
    let digest = digest(&data);
    tracing::debug!(challenge = %digest, "Generated random challenge");
    Challenge { digest, data }
}

fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
