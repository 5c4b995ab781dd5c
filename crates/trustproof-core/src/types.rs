//! Strong type definitions for TrustProof.
//!
//! Every hash in the system travels as a [`Hex64`]: 32 digest bytes whose
//! textual form is 64 hex characters. Parsing is case-insensitive; rendering
//! is always lowercase.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A 32-byte digest rendered as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hex64(pub [u8; 32]);

impl Hex64 {
    /// The all-zero value (the genesis sentinel).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex string, accepting either case.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::parse_field(s, "value")
    }

    /// Parse, naming the offending field in the error.
    pub fn parse_field(s: &str, field: &str) -> Result<Self, CoreError> {
        if !is_hex64(s) {
            return Err(CoreError::InvalidHex {
                field: field.to_string(),
            });
        }
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr).map_err(|_| CoreError::InvalidHex {
            field: field.to_string(),
        })?;
        Ok(Self(arr))
    }

    /// Whether this is the all-zero value.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

/// Whether `s` is exactly 64 ASCII hex digits (either case).
pub fn is_hex64(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Debug for Hex64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hex64({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hex64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hex64 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for Hex64 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Hex64 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Hex64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hex64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
