/**
 * Cryptographic types and operations.
 *  - SHA-512 file digests
 *  - RSA key pairs and PEM interchange
 *  - PKCS#1 v1.5 signing and verification
 *  - base64 transport encoding
 */
pub mod crypto;
/**
 * In-memory bookkeeping that maps stored
 *  file handles back to the names users gave them.
 */
pub mod registry;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::crypto::{
        verify_content, Digest, KeyError, SignError, SignedContent, Signer, SigningKey,
        VerificationResult, Verifier, VerifyingKey,
    };
    pub use crate::registry::SessionRegistry;
    pub use crate::version::{build_info, BuildInfo};
}
