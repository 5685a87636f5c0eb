use rsa::pkcs1v15;
use rsa::signature::Verifier as _;
use serde::Serialize;
use sha2::Sha512;

use super::digest::Digest;
use super::encoding;
use super::keys::VerifyingKey;

/// Outcome of checking a file against a claimed signature and public key
///
/// A mismatch is a normal answer, not an error: it means the inputs were
/// well formed and the cryptographic check said no. The malformed variants
/// mean the check never ran because an input could not be parsed, and carry
/// the parser's reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum VerificationResult {
    /// The signature was made by the matching private key over this digest
    Valid,
    /// Well-formed inputs, but the signature does not match
    SignatureMismatch,
    /// Decoded signature has the wrong shape for the key
    MalformedSignature(String),
    /// Public key text is not a usable RSA public key
    MalformedKey(String),
    /// Signature text is not valid base64
    EncodingError(String),
}

impl VerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationResult::Valid)
    }

    /// Whether the inputs were at least well formed
    pub fn is_well_formed(&self) -> bool {
        matches!(
            self,
            VerificationResult::Valid | VerificationResult::SignatureMismatch
        )
    }

    /// Stable machine-readable name
    pub fn kind(&self) -> &'static str {
        match self {
            VerificationResult::Valid => "valid",
            VerificationResult::SignatureMismatch => "signature_mismatch",
            VerificationResult::MalformedSignature(_) => "malformed_signature",
            VerificationResult::MalformedKey(_) => "malformed_key",
            VerificationResult::EncodingError(_) => "encoding_error",
        }
    }

    /// Sentence suitable for showing to a user
    pub fn message(&self) -> String {
        match self {
            VerificationResult::Valid => {
                "Verification succeeded: the file matches the signature and public key.".to_string()
            }
            VerificationResult::SignatureMismatch => {
                "Verification failed: the signature does not match the file or the public key. \
                 The file may have been modified, or the signature/public key is wrong."
                    .to_string()
            }
            VerificationResult::MalformedSignature(reason) => {
                format!("Verification failed: the signature is malformed: {}", reason)
            }
            VerificationResult::MalformedKey(reason) => {
                format!("Verification failed: the public key is not a valid PEM key: {}", reason)
            }
            VerificationResult::EncodingError(reason) => {
                format!("Verification failed: the signature is not valid base64: {}", reason)
            }
        }
    }
}

/// Checks signatures made by one public key
#[derive(Debug, Clone)]
pub struct Verifier {
    key: VerifyingKey,
}

impl From<VerifyingKey> for Verifier {
    fn from(key: VerifyingKey) -> Self {
        Self::new(key)
    }
}

impl Verifier {
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Verify raw signature bytes over a digest.
    ///
    /// Runs the standard PKCS#1 v1.5 / SHA-512 verification. Never returns
    /// `MalformedKey` or `EncodingError`; those belong to the text layer.
    pub fn verify(&self, digest: &Digest, signature: &[u8]) -> VerificationResult {
        let expected_len = self.key.signature_len();
        if signature.len() != expected_len {
            return VerificationResult::MalformedSignature(format!(
                "expected {} bytes for a {}-bit key, got {}",
                expected_len,
                self.key.bits(),
                signature.len()
            ));
        }

        let signature = match pkcs1v15::Signature::try_from(signature) {
            Ok(signature) => signature,
            Err(e) => return VerificationResult::MalformedSignature(e.to_string()),
        };

        let verifying_key = pkcs1v15::VerifyingKey::<Sha512>::new(self.key.inner().clone());
        match verifying_key.verify(digest.as_bytes(), &signature) {
            Ok(()) => VerificationResult::Valid,
            Err(e) => {
                tracing::debug!("signature check failed for digest {}: {}", digest, e);
                VerificationResult::SignatureMismatch
            }
        }
    }
}

/// Verify file content against a base64 signature and a PEM public key.
///
/// The key is parsed before the signature is decoded, so when both are
/// broken the result is `MalformedKey`.
pub fn verify_content(
    content: &[u8],
    signature_b64: &str,
    public_key_pem: &str,
) -> VerificationResult {
    let key = match VerifyingKey::from_pem(public_key_pem) {
        Ok(key) => key,
        Err(e) => return VerificationResult::MalformedKey(e.to_string()),
    };

    let signature = match encoding::decode(signature_b64) {
        Ok(signature) => signature,
        Err(e) => return VerificationResult::EncodingError(e.to_string()),
    };

    let digest = Digest::compute(content);
    Verifier::new(key).verify(&digest, &signature)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::Signer;

    #[test]
    fn test_sign_and_verify() {
        let signer = Signer::generate().unwrap();
        let verifier = Verifier::new(signer.verifying_key().clone());
        let digest = Digest::compute(b"hello, world!");

        let signature = signer.sign(&digest).unwrap();
        assert_eq!(
            verifier.verify(&digest, signature.as_bytes()),
            VerificationResult::Valid
        );

        // wrong message
        let wrong = Digest::compute(b"hello, world?");
        assert_eq!(
            verifier.verify(&wrong, signature.as_bytes()),
            VerificationResult::SignatureMismatch
        );
    }

    #[test]
    fn test_bare_digest_is_not_a_signature() {
        let signer = Signer::generate().unwrap();
        let verifier = Verifier::new(signer.verifying_key().clone());
        let digest = Digest::compute(b"anyone can hash this");

        let result = verifier.verify(&digest, digest.as_bytes());
        assert!(matches!(result, VerificationResult::MalformedSignature(_)));

        // padded out to the right length it is still rejected
        let mut forged = digest.as_bytes().to_vec();
        forged.resize(verifier.key().signature_len(), 0);
        assert_eq!(
            verifier.verify(&digest, &forged),
            VerificationResult::SignatureMismatch
        );
    }

    #[test]
    fn test_empty_signature_is_malformed() {
        let signer = Signer::generate().unwrap();
        let verifier = Verifier::from(signer.verifying_key().clone());
        let result = verifier.verify(&Digest::compute(b""), &[]);
        assert_eq!(result.kind(), "malformed_signature");
        assert!(!result.is_well_formed());
    }

    #[test]
    fn test_result_serializes_with_kind() {
        let json = serde_json::to_value(VerificationResult::Valid).unwrap();
        assert_eq!(json, serde_json::json!({"result": "valid"}));

        let json =
            serde_json::to_value(VerificationResult::MalformedKey("bad".to_string())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"result": "malformed_key", "reason": "bad"})
        );
    }

    #[test]
    fn test_messages_distinguish_mismatch_from_malformed_input() {
        let mismatch = VerificationResult::SignatureMismatch.message();
        let malformed = VerificationResult::MalformedKey("x".to_string()).message();
        assert!(mismatch.contains("does not match"));
        assert!(malformed.contains("not a valid PEM key"));
    }
}
