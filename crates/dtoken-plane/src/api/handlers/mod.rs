//! API request handlers

pub mod auth;
pub mod sign;
pub mod status;

pub use auth::{authenticate, AuthRequest};
pub use sign::{sign, SignRequest};
pub use status::status;

use dtoken_bridge::AuthorityClient;
use std::sync::Arc;

use crate::config::{RequesterIdentity, ServiceConfig, VerificationMode};
use crate::storage::{MemorySessionStore, SessionStore};

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    /// Client for the remote signing authority
    pub client: AuthorityClient,
    /// Pending sessions keyed by remote session id
    pub store: Arc<dyn SessionStore>,
    /// Requester fields sent with authentication challenges
    pub requester: RequesterIdentity,
    pub verification_mode: VerificationMode,
}

impl AppState {
    /// State with an in-memory session store sized from `config`
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            client: AuthorityClient::new(config.authority.clone()),
            store: Arc::new(MemorySessionStore::with_ttl(config.session_ttl)),
            requester: config.requester.clone(),
            verification_mode: config.verification_mode,
        }
    }
}
