//! Signing Authority Bridge
//!
//! Client for the remote signing authority's OAuth and digital token APIs.
//!
//! ## Token Lifecycle
//!
//! Every outbound call is wrapped in its own bearer token:
//!
//! 1. Build a self-signed client assertion (RS256, certificate in `x5c`)
//! 2. Exchange it at `/oauth2/v1/token` (JWT-bearer grant, scope `3skey`)
//! 3. Make exactly one digital token call with the bearer token
//! 4. Revoke the token at `/oauth2/v1/revoke`, on every exit path
//!
//! ## Usage
//!
//! ```ignore
//! use dtoken_bridge::{AuthorityClient, AuthorityConfig};
//!
//! let client = AuthorityClient::new(config);
//! let status = client
//!     .with_token(|token| {
//!         let client = client.clone();
//!         async move { client.status(&token, "session-1").await }
//!     })
//!     .await?;
//! ```

pub mod client;
pub mod digital_token;
pub mod error;
pub mod token;
pub mod types;

pub use client::{AuthorityClient, AuthorityConfig};
pub use error::{BridgeError, Result};
pub use token::TokenLease;
pub use types::{session_id_of, AuthenticationRequest, BearerToken, SignatureRequest, StatusView};
