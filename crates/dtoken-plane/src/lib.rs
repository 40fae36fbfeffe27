//! Digital Token Gateway Server
//!
//! Relying-party backend for the digital token challenge/response flow:
//! - Starts authentication challenges and signing requests
//! - Tracks each pending session by its remote session id
//! - Polls session status and verifies completed signatures
//!
//! ## Verification
//!
//! When a session completes, the signer certificate's expiry is checked and
//! the signature is verified against the data behind the challenge digest.
//! In `advisory` mode failures are logged and the remote payload is returned
//! as is. In `strict` mode they become a `502 VERIFICATION_FAILED`.
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check with pending session count
//! - `GET /api/test` - Backend self-test
//! - `POST /api/auth` - Start an authentication challenge
//! - `POST /api/sign` - Start a signing request (single digest or batch)
//! - `GET /api/status/{session_id}` - Poll a session, verifying on completion

pub mod api;
pub mod config;
pub mod core;
pub mod storage;

pub use api::create_router;
pub use api::handlers::AppState;
pub use config::{ConfigError, RequesterIdentity, ServiceConfig, VerificationMode};
pub use storage::{MemorySessionStore, SessionKind, SessionRecord, SessionStore};
