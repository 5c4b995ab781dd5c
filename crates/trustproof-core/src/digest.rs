//! SHA-256 digests rendered as lowercase hex.

use sha2::{Digest, Sha256};

use crate::types::Hex64;

/// Compute the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> Hex64 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Hex64(hasher.finalize().into())
}

/// Compute the SHA-256 digest of `data` as 64 lowercase hex characters.
pub fn sha256_hex(data: &[u8]) -> String {
    sha256(data).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_is_lowercase_hex64() {
        let h = sha256_hex(b"hello world");
        assert_eq!(h.len(), 64);
        assert_eq!(h, h.to_lowercase());
        assert_ne!(h, sha256_hex(b"hello worlD"));
    }
}
