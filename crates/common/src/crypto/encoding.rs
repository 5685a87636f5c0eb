//! Transport encoding for signatures
//!
//! Signatures are raw bytes; users move them around through forms, chat
//! messages and clipboards, so they are carried as standard base64 with
//! padding and no line wrapping.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

#[derive(Debug, thiserror::Error)]
#[error("invalid base64: {0}")]
pub struct EncodingError(#[from] base64::DecodeError);

/// Encode bytes as standard base64.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64.
///
/// Strict: characters outside the alphabet (whitespace included) and bad
/// padding are rejected. Callers trim user input before handing it over.
pub fn decode(text: &str) -> Result<Vec<u8>, EncodingError> {
    Ok(STANDARD.decode(text)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_round_trip_empty() {
        assert_eq!(encode(b""), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_round_trip_short() {
        let bytes = b"single byte";
        assert_eq!(decode(&encode(bytes)).unwrap(), bytes);
    }

    #[test]
    fn test_round_trip_one_megabyte() {
        let mut bytes = vec![0u8; 1024 * 1024];
        rand::thread_rng().fill_bytes(&mut bytes);

        let encoded = encode(&bytes);
        assert!(!encoded.contains('\n'));
        assert_eq!(decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn test_rejects_characters_outside_alphabet() {
        assert!(decode("not-base64!!").is_err());
        assert!(decode("aGVs bG8=").is_err());
    }

    #[test]
    fn test_rejects_bad_padding() {
        assert!(decode("aGVsbG8").is_err());
        assert!(decode("aGVsbG8==").is_err());
    }
}
