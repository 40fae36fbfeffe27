//! Property-Based Tests for digests and challenges
//!
//! 1. DETERMINISM: the same bytes always digest to the same value
//! 2. DISCRIMINATION: distinct inputs produce distinct digests
//! 3. BINDING: a challenge digest always matches its data
//!
//! Uses proptest for property-based testing with arbitrary inputs.

use base64::{engine::general_purpose::STANDARD, Engine};
use proptest::prelude::*;
use dtoken_core::digest::{digest, matches, random_challenge, CHALLENGE_LENGTH};

proptest! {
    /// Digest is a pure function of its input
    #[test]
    fn prop_digest_deterministic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(digest(&data), digest(&data));
    }

    /// Digest decodes to 32 bytes of standard base64
    #[test]
    fn prop_digest_is_256_bit_base64(data in ".*") {
        let encoded = digest(&data);
        let raw = STANDARD.decode(encoded.as_str()).expect("standard base64");
        prop_assert_eq!(raw.len(), 32);
    }

    /// Different messages yield different digests
    #[test]
    fn prop_distinct_inputs_distinct_digests(a in ".{0,64}", b in ".{0,64}") {
        prop_assume!(a != b);
        prop_assert_ne!(digest(&a), digest(&b));
    }

    /// A message matches its own digest and no other message's
    #[test]
    fn prop_matches_only_own_digest(a in "[a-zA-Z0-9 ]{1,64}", b in "[a-zA-Z0-9 ]{1,64}") {
        prop_assume!(a != b);
        let d = digest(&a);
        prop_assert!(matches(&a, &d));
        prop_assert!(!matches(&b, &d));
    }
}

#[test]
fn challenge_digest_binds_data() {
    for _ in 0..64 {
        let challenge = random_challenge();
        assert_eq!(challenge.data.len(), CHALLENGE_LENGTH);
        assert_eq!(challenge.digest, digest(&challenge.data));
    }
}

#[test]
fn challenges_are_unique() {
    let first = random_challenge();
    let second = random_challenge();
    assert_ne!(first.data, second.data);
    assert_ne!(first.digest, second.digest);
}
