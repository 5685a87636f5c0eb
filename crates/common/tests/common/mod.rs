//! Shared test utilities for signing and verification tests
#![allow(dead_code)]

use std::sync::OnceLock;

use common::crypto::Signer;

/// A signer shared by every test in a binary. RSA key generation is slow
/// enough that one key per test adds up.
pub fn signer() -> &'static Signer {
    static SIGNER: OnceLock<Signer> = OnceLock::new();
    SIGNER.get_or_init(|| Signer::generate().unwrap())
}

/// A second, unrelated signer for wrong-key checks
pub fn other_signer() -> &'static Signer {
    static OTHER: OnceLock<Signer> = OnceLock::new();
    OTHER.get_or_init(|| Signer::generate().unwrap())
}

/// Deterministic pseudo-random bytes (xorshift), so failures reproduce
pub fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state & 0xff) as u8
        })
        .collect()
}

/// Flip the lowest bit of the byte at `index`
pub fn flip_bit(content: &[u8], index: usize) -> Vec<u8> {
    let mut flipped = content.to_vec();
    flipped[index] ^= 0x01;
    flipped
}
