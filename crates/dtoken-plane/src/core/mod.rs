//! Core logic for the gateway

mod verification;

pub use verification::{verify_completion, SignatureCheck, VerificationReport};
