use std::fmt;

use rand::rngs::OsRng;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest as _, Sha256};

/// Modulus size used for freshly generated keys
pub const RSA_KEY_BITS: usize = 2048;
/// Smallest modulus we are willing to generate
pub const MIN_RSA_KEY_BITS: usize = 2048;

/// PEM tag for SubjectPublicKeyInfo encoded keys (what we emit)
const SPKI_PEM_TAG: &str = "PUBLIC KEY";
/// PEM tag for bare PKCS#1 RSA public keys (accepted on input)
const PKCS1_PEM_TAG: &str = "RSA PUBLIC KEY";

/// Errors that can occur during key operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("failed to generate RSA key: {0}")]
    Generation(String),
    #[error("refusing to generate a {bits}-bit RSA key, minimum is {min} bits")]
    TooWeak { bits: usize, min: usize },
    #[error("malformed public key: {0}")]
    Malformed(String),
    #[error("failed to serialize public key: {0}")]
    Serialize(String),
}

/// Public half of a signer's RSA key pair
///
/// This is what the sender hands to the receiver, next to the signature, over
/// a channel the receiver trusts. It travels as a SubjectPublicKeyInfo PEM
/// block:
///
/// ```text
/// -----BEGIN PUBLIC KEY-----
/// MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA...
/// -----END PUBLIC KEY-----
/// ```
///
/// # Examples
///
/// ```ignore
/// let signing_key = SigningKey::generate()?;
/// let public_key = signing_key.verifying_key();
///
/// let pem = public_key.to_pem()?;
/// let recovered = VerifyingKey::from_pem(&pem)?;
/// assert_eq!(public_key, recovered);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerifyingKey(RsaPublicKey);

impl From<RsaPublicKey> for VerifyingKey {
    fn from(key: RsaPublicKey) -> Self {
        VerifyingKey(key)
    }
}

impl VerifyingKey {
    pub(crate) fn inner(&self) -> &RsaPublicKey {
        &self.0
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.0.size() * 8
    }

    /// Length in bytes of every signature this key verifies
    pub fn signature_len(&self) -> usize {
        self.0.size()
    }

    /// Encode as SubjectPublicKeyInfo DER
    pub fn to_der(&self) -> Result<Vec<u8>, KeyError> {
        self.0
            .to_public_key_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| KeyError::Serialize(e.to_string()))
    }

    /// Encode as a PEM block with tag "PUBLIC KEY".
    ///
    /// Output is deterministic: LF line endings, 64-column body.
    pub fn to_pem(&self) -> Result<String, KeyError> {
        let pem = pem::Pem::new(SPKI_PEM_TAG, self.to_der()?);
        let config = pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF);
        Ok(pem::encode_config(&pem, config))
    }

    /// Parse a public key from PEM format
    ///
    /// Accepts "PUBLIC KEY" (SubjectPublicKeyInfo) and "RSA PUBLIC KEY"
    /// (PKCS#1) blocks. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Malformed`] if:
    /// - The PEM string is malformed
    /// - The PEM tag is not one of the two above
    /// - The body is not a DER encoded RSA public key
    pub fn from_pem(pem_str: &str) -> Result<Self, KeyError> {
        let pem = pem::parse(pem_str.trim())
            .map_err(|e| KeyError::Malformed(format!("failed to parse PEM: {}", e)))?;

        let key = match pem.tag() {
            SPKI_PEM_TAG => RsaPublicKey::from_public_key_der(pem.contents())
                .map_err(|e| KeyError::Malformed(e.to_string()))?,
            PKCS1_PEM_TAG => RsaPublicKey::from_pkcs1_der(pem.contents())
                .map_err(|e| KeyError::Malformed(e.to_string()))?,
            other => {
                return Err(KeyError::Malformed(format!(
                    "invalid PEM tag {:?}, expected {:?}",
                    other, SPKI_PEM_TAG
                )))
            }
        };

        Ok(Self(key))
    }

    /// Hex SHA-256 of the DER encoding, a short stable name for this key
    pub fn fingerprint(&self) -> Result<String, KeyError> {
        Ok(hex::encode(Sha256::digest(self.to_der()?)))
    }
}

/// Private half of a signer's RSA key pair
///
/// Lives only in the memory of the process that generated it: it has no
/// serialization of any kind and its `Debug` output is redacted. A running
/// daemon generates exactly one of these at startup.
#[derive(Clone)]
pub struct SigningKey(RsaPrivateKey);

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Generate a new RSA-2048 key (e = 65537) from the OS CSPRNG
    pub fn generate() -> Result<Self, KeyError> {
        Self::generate_with_bits(RSA_KEY_BITS)
    }

    /// Generate a new key with a custom modulus size, at least [`MIN_RSA_KEY_BITS`]
    pub fn generate_with_bits(bits: usize) -> Result<Self, KeyError> {
        if bits < MIN_RSA_KEY_BITS {
            return Err(KeyError::TooWeak {
                bits,
                min: MIN_RSA_KEY_BITS,
            });
        }
        let key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| KeyError::Generation(e.to_string()))?;
        Ok(Self(key))
    }

    pub(crate) fn inner(&self) -> &RsaPrivateKey {
        &self.0
    }

    /// Derive the public key from this signing key
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.to_public_key())
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.0.size() * 8
    }
}
