use std::fmt;
use std::io::Read;

use sha2::{Digest as _, Sha512};

/// Size of a SHA-512 digest in bytes
pub const DIGEST_SIZE: usize = 64;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// SHA-512 fingerprint of a file's contents
///
/// The digest is the only thing that gets signed, so two byte-identical files
/// always share a digest and therefore a signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Hash a complete byte slice. The empty slice hashes to SHA-512("").
    pub fn compute(content: &[u8]) -> Self {
        let mut hasher = Sha512::new();
        hasher.update(content);
        Self::from_hasher(hasher)
    }

    /// Hash everything a reader yields, without buffering it all in memory.
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut hasher = Sha512::new();
        let mut buf = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Self::from_hasher(hasher))
    }

    fn from_hasher(hasher: Sha512) -> Self {
        let mut bytes = [0u8; DIGEST_SIZE];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Lowercase hex, as printed by `sha512sum`
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_empty_input_matches_known_vector() {
        let digest = Digest::compute(b"");
        assert_eq!(
            digest.to_hex(),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn test_abc_matches_known_vector() {
        let digest = Digest::compute(b"abc");
        assert_eq!(
            digest.to_hex(),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        let content = b"the same bytes twice";
        assert_eq!(Digest::compute(content), Digest::compute(content));
    }

    #[test]
    fn test_single_bit_flip_changes_digest() {
        let original = b"hello, world!".to_vec();
        let mut flipped = original.clone();
        flipped[4] ^= 0x01;

        assert_ne!(Digest::compute(&original), Digest::compute(&flipped));
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        // larger than one read chunk so the loop runs more than once
        let content: Vec<u8> = (0..(READ_CHUNK_SIZE * 3 + 17))
            .map(|i| (i % 251) as u8)
            .collect();

        let streamed = Digest::from_reader(Cursor::new(&content)).unwrap();
        assert_eq!(streamed, Digest::compute(&content));
    }
}
