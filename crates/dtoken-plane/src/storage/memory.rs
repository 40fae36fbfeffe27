//! In-memory session store
//!
//! Default storage backed by a moka cache. Entries expire after a fixed
//! time-to-live so abandoned PENDING sessions do not accumulate. Data is
//! lost on restart. Failed verification reports are kept in a second
//! cache with the same lifetime.

use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{SessionRecord, SessionStore, StorageError};
use crate::core::VerificationReport;

/// Default lifetime of a pending session
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(600);

const MAX_PENDING_SESSIONS: u64 = 10_000;

/// In-memory session store keyed by remote session id
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    sessions: Cache<String, SessionRecord>,
    failures: Cache<String, VerificationReport>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    /// Store whose entries expire `ttl` after insertion
    pub fn with_ttl(ttl: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_PENDING_SESSIONS)
            .time_to_live(ttl)
            .build();
        let failures = Cache::builder()
            .max_capacity(MAX_PENDING_SESSIONS)
            .time_to_live(ttl)
            .build();
        Self { sessions, failures }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn record(&self, session_id: &str, record: SessionRecord) -> Result<(), StorageError> {
        info!(
            session_id = %session_id,
            kind = record.kind.as_str(),
            verifiable = record.provenance_data.is_some(),
            "Recording pending session"
        );
        self.failures.invalidate(session_id).await;
        self.sessions.insert(session_id.to_string(), record).await;
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, StorageError> {
        Ok(self.sessions.get(session_id).await)
    }

    async fn take(&self, session_id: &str) -> Result<Option<SessionRecord>, StorageError> {
        let record = self.sessions.remove(session_id).await;
        if record.is_some() {
            debug!(session_id = %session_id, "Closed session");
        }
        Ok(record)
    }

    async fn len(&self) -> Result<u64, StorageError> {
        self.sessions.run_pending_tasks().await;
        Ok(self.sessions.entry_count())
    }

    async fn record_failure(
        &self,
        session_id: &str,
        report: VerificationReport,
    ) -> Result<(), StorageError> {
        warn!(session_id = %session_id, "Recording failed verification");
        self.failures.insert(session_id.to_string(), report).await;
        Ok(())
    }

    async fn failure(&self, session_id: &str) -> Result<Option<VerificationReport>, StorageError> {
        Ok(self.failures.get(session_id).await)
    }
}
