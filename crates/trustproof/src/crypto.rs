//! Ed25519 keys for signing and verifying proof tokens.
//!
//! Wraps ed25519-dalek with strong types. Key storage and PEM handling are the
//! host's concern; keys enter here as raw bytes or seeds.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use std::fmt;

use crate::token::TokenError;

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }

    /// Verify a signature over a message.
    ///
    /// Uses strict verification: small-order keys and non-canonical
    /// signatures are rejected.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), TokenError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| TokenError::InvalidPublicKey)?;
        let sig = Signature::from_bytes(&signature.0);
        verifying_key
            .verify_strict(message, &sig)
            .map_err(|_| TokenError::BadSignature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

impl From<[u8; 32]> for Ed25519PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<VerifyingKey> for Ed25519PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Parse from a byte slice, which must be exactly 64 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TokenError> {
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| TokenError::SignatureLength(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &hex::encode(self.0)[..16])
    }
}

/// A keypair for signing proof tokens.
///
/// This wraps ed25519-dalek's SigningKey.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }

    /// Get the raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let keypair = Keypair::generate();
        let sig = keypair.sign(b"header.payload");
        assert!(keypair.public_key().verify(b"header.payload", &sig).is_ok());
        assert_eq!(
            keypair.public_key().verify(b"header.payloaD", &sig),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        let signer = Keypair::from_seed(&[1u8; 32]);
        let other = Keypair::from_seed(&[2u8; 32]);
        let sig = signer.sign(b"msg");
        assert!(other.public_key().verify(b"msg", &sig).is_err());
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = Keypair::from_seed(&[7u8; 32]);
        let b = Keypair::from_seed(&[7u8; 32]);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.seed(), [7u8; 32]);
        assert_eq!(a.sign(b"x"), b.sign(b"x"));
    }

    #[test]
    fn test_public_key_hex() {
        let key = Keypair::from_seed(&[3u8; 32]).public_key();
        assert_eq!(Ed25519PublicKey::from_hex(&key.to_hex()).unwrap(), key);
        assert!(Ed25519PublicKey::from_hex("abcd").is_err());
    }

    #[test]
    fn test_signature_length_enforced() {
        assert_eq!(
            Ed25519Signature::from_slice(&[0u8; 63]),
            Err(TokenError::SignatureLength(63))
        );
        assert!(Ed25519Signature::from_slice(&[0u8; 64]).is_ok());
    }

    #[test]
    fn test_debug_hides_secret() {
        let keypair = Keypair::from_seed(&[9u8; 32]);
        let rendered = format!("{:?}", keypair);
        assert!(rendered.contains("Ed25519Pub("));
        assert!(!rendered.contains(&hex::encode([9u8; 32])));
    }
}
