use std::fmt;
use std::sync::Arc;

use rand::rngs::OsRng;
use rsa::pkcs1v15;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use sha2::Sha512;

use super::digest::Digest;
use super::encoding;
use super::keys::{KeyError, SigningKey, VerifyingKey};

/// Errors that can occur while producing a signature
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("signing failed: {0}")]
    SigningFailure(String),
}

/// Raw RSASSA-PKCS1-v1_5 signature bytes
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Transport form, see [`encoding::encode`]
    pub fn to_base64(&self) -> String {
        encoding::encode(&self.0)
    }

    pub fn from_base64(text: &str) -> Result<Self, encoding::EncodingError> {
        encoding::decode(text).map(Self)
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({} bytes)", self.0.len())
    }
}

/// Everything a sender needs to hand to a receiver, in text form
#[derive(Debug, Clone)]
pub struct SignedContent {
    /// SHA-512 of the signed bytes
    pub digest: Digest,
    /// base64 encoded signature
    pub signature: String,
    /// PEM encoded public key
    pub public_key: String,
}

struct SignerInner {
    signing_key: pkcs1v15::SigningKey<Sha512>,
    verifying_key: VerifyingKey,
    public_key_pem: String,
    fingerprint: String,
}

/// Signs digests with one private key for the lifetime of a process
///
/// Construct it once at startup and share it: cloning is cheap and the key
/// is never mutated, so concurrent `sign` calls need no locking. Tests build
/// their own with [`Signer::new`] around a key of their choosing.
///
/// The scheme is RSASSA-PKCS1-v1_5 with SHA-512, applied to the 64 digest
/// bytes as the message (so the digest is hashed once more inside the
/// scheme). The padding is deterministic. Private key operations are
/// blinded with the OS RNG; blinding does not change the output.
#[derive(Clone)]
pub struct Signer(Arc<SignerInner>);

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("fingerprint", &self.0.fingerprint)
            .finish_non_exhaustive()
    }
}

impl Signer {
    pub fn new(key: SigningKey) -> Result<Self, KeyError> {
        let verifying_key = key.verifying_key();
        let public_key_pem = verifying_key.to_pem()?;
        let fingerprint = verifying_key.fingerprint()?;
        let signing_key = pkcs1v15::SigningKey::<Sha512>::new(key.inner().clone());

        tracing::debug!(bits = key.bits(), %fingerprint, "signer initialized");

        Ok(Self(Arc::new(SignerInner {
            signing_key,
            verifying_key,
            public_key_pem,
            fingerprint,
        })))
    }

    /// Build a signer around a freshly generated key
    pub fn generate() -> Result<Self, KeyError> {
        Self::new(SigningKey::generate()?)
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.0.verifying_key
    }

    /// Public key as PEM, computed once at construction
    pub fn public_key_pem(&self) -> &str {
        &self.0.public_key_pem
    }

    /// Hex SHA-256 of the public key DER
    pub fn fingerprint(&self) -> &str {
        &self.0.fingerprint
    }

    /// Sign a digest.
    ///
    /// Only fails on internal errors such as the RNG being unavailable.
    pub fn sign(&self, digest: &Digest) -> Result<Signature, SignError> {
        let signature = self
            .0
            .signing_key
            .try_sign_with_rng(&mut OsRng, digest.as_bytes())
            .map_err(|e| {
                tracing::error!("failed to sign digest {}: {}", digest, e);
                SignError::SigningFailure(e.to_string())
            })?;
        Ok(Signature(signature.to_vec()))
    }

    /// Hash, sign and encode file content in one go.
    pub fn sign_content(&self, content: &[u8]) -> Result<SignedContent, SignError> {
        let digest = Digest::compute(content);
        let signature = self.sign(&digest)?;

        tracing::debug!(
            size = content.len(),
            %digest,
            "signed content"
        );

        Ok(SignedContent {
            digest,
            signature: signature.to_base64(),
            public_key: self.public_key_pem().to_string(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_signature_is_deterministic() {
        let signer = Signer::generate().unwrap();
        let digest = Digest::compute(b"hello, world!");

        let first = signer.sign(&digest).unwrap();
        let second = signer.sign(&digest).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), signer.verifying_key().signature_len());
    }

    #[test]
    fn test_different_digests_give_different_signatures() {
        let signer = Signer::generate().unwrap();

        let first = signer.sign(&Digest::compute(b"abc")).unwrap();
        let second = signer.sign(&Digest::compute(b"abd")).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_sign_content_emits_transport_forms() {
        let signer = Signer::generate().unwrap();
        let signed = signer.sign_content(b"abc").unwrap();

        assert_eq!(signed.digest, Digest::compute(b"abc"));
        assert_eq!(signed.public_key, signer.public_key_pem());

        let raw = Signature::from_base64(&signed.signature).unwrap();
        assert_eq!(raw, signer.sign(&signed.digest).unwrap());
    }

    #[test]
    fn test_concurrent_signing_with_one_signer() {
        let signer = Signer::generate().unwrap();

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let signer = signer.clone();
                std::thread::spawn(move || {
                    let content = vec![i; 4096];
                    let signed = signer.sign_content(&content).unwrap();
                    (content, signed)
                })
            })
            .collect();

        for handle in handles {
            let (content, signed) = handle.join().unwrap();
            let result = crate::crypto::verifier::verify_content(
                &content,
                &signed.signature,
                &signed.public_key,
            );
            assert!(result.is_valid(), "{}", result.message());
        }
    }

    #[test]
    fn test_clones_share_the_key() {
        let signer = Signer::generate().unwrap();
        let clone = signer.clone();
        assert_eq!(signer.fingerprint(), clone.fingerprint());
        assert_eq!(signer.verifying_key(), clone.verifying_key());
    }
}
