use std::fmt;
use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::error::TypeError;

/// SHA-256 digest of side-stored content.
///
/// A `Digest` identifies content by value: identical bytes always produce the
/// same digest. It is rendered as 64 lowercase hex characters, the form used
/// both in pointer documents (`oid sha256:<hex>`) and as the storage path
/// inside the side store.
///
/// Distinct from [`ObjectId`](crate::ObjectId): an `ObjectId` addresses a
/// blob inside the version-control object database, a `Digest` addresses the
/// original bytes inside the side store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Compute the digest of an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Compute the digest by streaming a reader to exhaustion.
    ///
    /// Returns the digest and the number of bytes consumed. The content is
    /// never held in memory as a whole.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<(Self, u64)> {
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 64 * 1024];
        let mut total = 0u64;
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            total += n as u64;
        }
        Ok((Self(hasher.finalize().into()), total))
    }

    /// Create a `Digest` from a pre-computed 32-byte hash.
    pub fn from_raw(raw: [u8; 32]) -> Self {
        Self(raw)
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase 64-character hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA-256("hello"), the reference vector used throughout the rewrite
    // tests as well.
    const HELLO_HEX: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn known_vector() {
        let digest = Digest::from_bytes(b"hello");
        assert_eq!(digest.to_hex(), HELLO_HEX);
    }

    #[test]
    fn from_reader_matches_from_bytes() {
        let data = b"streaming and in-memory hashing must agree";
        let (streamed, size) = Digest::from_reader(&data[..]).unwrap();
        assert_eq!(streamed, Digest::from_bytes(data));
        assert_eq!(size, data.len() as u64);
    }

    #[test]
    fn from_reader_empty() {
        let (digest, size) = Digest::from_reader(&b""[..]).unwrap();
        assert_eq!(digest, Digest::from_bytes(b""));
        assert_eq!(size, 0);
    }

    #[test]
    fn hex_roundtrip() {
        let digest = Digest::from_bytes(b"roundtrip");
        let parsed = Digest::from_hex(&digest.to_hex()).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            Digest::from_hex("not hex at all"),
            Err(TypeError::InvalidHex(_))
        ));
        assert!(matches!(
            Digest::from_hex("abcd"),
            Err(TypeError::InvalidLength { .. })
        ));
    }

    #[test]
    fn display_is_lowercase_64_chars() {
        let digest = Digest::from_bytes(b"display");
        let s = format!("{digest}");
        assert_eq!(s.len(), 64);
        assert_eq!(s, s.to_lowercase());
    }

    proptest::proptest! {
        #[test]
        fn streaming_agrees_with_oneshot(data: Vec<u8>) {
            let (streamed, size) = Digest::from_reader(data.as_slice()).unwrap();
            proptest::prop_assert_eq!(streamed, Digest::from_bytes(&data));
            proptest::prop_assert_eq!(size, data.len() as u64);
        }
    }
}
