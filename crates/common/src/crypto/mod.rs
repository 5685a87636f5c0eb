//! Cryptographic primitives for filesig
//!
//! This module is the signature-and-verification engine:
//!
//! - **Digest**: SHA-512 over the raw file bytes
//! - **Keys**: RSA-2048 key pairs, public keys exchanged as SPKI PEM
//! - **Signing**: RSASSA-PKCS1-v1_5 with SHA-512 over the digest
//! - **Encoding**: standard base64 for signatures
//!
//! # Trust Model
//!
//! The file travels over a channel the signer does not control. The signature
//! and the PEM public key travel over a separate channel the receiver trusts.
//! Anyone can recompute a SHA-512, so a bare digest proves nothing; only a
//! signature that verifies under the signer's public key does.
//!
//! ## Signing
//! 1. Hash the file: `digest = SHA-512(file)`
//! 2. Sign the 64 digest bytes with PKCS#1 v1.5 / SHA-512
//! 3. Emit `base64(signature)` and the PEM public key
//!
//! ## Verifying
//! 1. Parse the PEM public key (`MalformedKey` on failure)
//! 2. Decode the base64 signature (`EncodingError` on failure)
//! 3. Recompute the digest of the received file
//! 4. Run the PKCS#1 v1.5 verification (`SignatureMismatch` on failure)
//!
//! PKCS#1 v1.5 padding is deterministic: a key always produces the same
//! signature for the same digest.

mod digest;
mod encoding;
mod keys;
mod signer;
mod verifier;

pub use digest::{Digest, DIGEST_SIZE};
pub use encoding::{decode, encode, EncodingError};
pub use keys::{KeyError, SigningKey, VerifyingKey, MIN_RSA_KEY_BITS, RSA_KEY_BITS};
pub use signer::{SignError, Signature, SignedContent, Signer};
pub use verifier::{verify_content, VerificationResult, Verifier};
