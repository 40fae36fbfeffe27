//! Common types shared by the gateway and the authority client

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base64-encoded SHA-256 digest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Wrap an already encoded digest value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Digest {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Digest {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Digest field of a signing request
///
/// The remote service accepts either a single digest or an ordered batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DigestInput {
    Single(Digest),
    Batch(Vec<Digest>),
}

impl DigestInput {
    /// The digest when exactly one was supplied
    pub fn single(&self) -> Option<&Digest> {
        match self {
            DigestInput::Single(digest) => Some(digest),
            DigestInput::Batch(_) => None,
        }
    }

    /// Number of digests carried
    pub fn len(&self) -> usize {
        match self {
            DigestInput::Single(_) => 1,
            DigestInput::Batch(digests) => digests.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Digest> for DigestInput {
    fn from(digest: Digest) -> Self {
        DigestInput::Single(digest)
    }
}
