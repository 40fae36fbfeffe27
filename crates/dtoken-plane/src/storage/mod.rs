//! Session storage for in-flight challenges
//!
//! Each authentication or signing request that the remote service accepted
//! leaves one record here, keyed by the remote session id. The record holds
//! what we need to check the eventual signature:
//! - the challenge digest(s) we submitted
//! - the data behind the digest, when we know it
//!
//! Records are single-use: the status handler takes a record out before
//! verifying it. A failed verification leaves a report behind under the
//! same session id so later polls cannot skip it.

pub mod memory;

pub use memory::MemorySessionStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dtoken_core::DigestInput;
use std::fmt::Debug;

use crate::core::VerificationReport;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Which flow opened a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Authentication,
    Signature,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Authentication => "authentication",
            SessionKind::Signature => "signature",
        }
    }
}

/// State kept for one pending session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Digest(s) sent to the remote service, if any were sent
    pub expected_challenge: Option<DigestInput>,
    /// Data whose digest equals `expected_challenge`
    ///
    /// `None` means the data behind the digest is unknown and the
    /// signature cannot be checked.
    pub provenance_data: Option<String>,
    pub kind: SessionKind,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Record for an authentication challenge; the random data is always known
    pub fn authentication(challenge: dtoken_core::Challenge) -> Self {
        Self {
            expected_challenge: Some(DigestInput::Single(challenge.digest)),
            provenance_data: Some(challenge.data),
            kind: SessionKind::Authentication,
            created_at: Utc::now(),
        }
    }

    /// Record for a signing request
    ///
    /// `message` is kept only when it is the preimage of a single digest.
    pub fn signature(digest: Option<DigestInput>, message: Option<&str>) -> Self {
        let provenance_data = match (digest.as_ref().and_then(|d| d.single()), message) {
            (Some(single), Some(message)) if dtoken_core::digest::matches(message, single) => {
                Some(message.to_string())
            }
            _ => None,
        };

        Self {
            expected_challenge: digest,
            provenance_data,
            kind: SessionKind::Signature,
            created_at: Utc::now(),
        }
    }
}

/// Storage backend for pending sessions
///
/// Implementations must be safe for concurrent requests.
#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    /// Store the record for `session_id`, replacing any previous one
    async fn record(&self, session_id: &str, record: SessionRecord) -> Result<(), StorageError>;

    /// Look at a record without consuming it
    ///
    /// Inspection hook for diagnostics and tests; the request flow only
    /// ever `take`s.
    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, StorageError>;

    /// Remove and return a record
    async fn take(&self, session_id: &str) -> Result<Option<SessionRecord>, StorageError>;

    /// Number of pending sessions
    async fn len(&self) -> Result<u64, StorageError>;

    /// Remember that `session_id` completed but failed verification
    async fn record_failure(
        &self,
        session_id: &str,
        report: VerificationReport,
    ) -> Result<(), StorageError>;

    /// Failed verification previously recorded for `session_id`
    async fn failure(&self, session_id: &str) -> Result<Option<VerificationReport>, StorageError>;
}
