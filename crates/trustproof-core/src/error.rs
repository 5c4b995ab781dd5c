//! Error types for TrustProof Core.
//!
//! Two families live here. [`CoreError`] is returned by the trusted-path
//! primitives (a caller handed us something it should not have).
//! [`ProofError`] is the structured, accumulating error reported for
//! untrusted input during verification.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised by the core primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("{field} must be a 64-char hex string")]
    InvalidHex { field: String },

    #[error("invalid predecessor: {0}")]
    InvalidPredecessor(String),

    #[error("claims are missing event field `{0}`")]
    MissingField(&'static str),
}

/// Stable verification error codes.
///
/// The serialized names are part of the wire contract shared with other
/// implementations and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Signature check failed or the token framing is unparseable.
    InvalidSignature,
    /// Claims are missing required fields or carry malformed sub-objects.
    InvalidSchema,
    /// `jti` is absent, not a string, or blank.
    MissingJti,
    /// `hashes.input_hash` disagrees with the expected input.
    InputHashMismatch,
    /// `hashes.output_hash` disagrees with the expected output.
    OutputHashMismatch,
    /// A chain element failed its own verification.
    InvalidProof,
    /// `chain.entry_hash` does not match its recomputation.
    ChainEntryHashMismatch,
    /// The first element does not start from the genesis hash.
    ChainGenesisPrevHashInvalid,
    /// `chain.prev_hash` does not match the predecessor's entry hash.
    ChainLinkMismatch,
}

impl ErrorCode {
    /// The wire name of this code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidSchema => "INVALID_SCHEMA",
            Self::MissingJti => "MISSING_JTI",
            Self::InputHashMismatch => "INPUT_HASH_MISMATCH",
            Self::OutputHashMismatch => "OUTPUT_HASH_MISMATCH",
            Self::InvalidProof => "INVALID_PROOF",
            Self::ChainEntryHashMismatch => "CHAIN_ENTRY_HASH_MISMATCH",
            Self::ChainGenesisPrevHashInvalid => "CHAIN_GENESIS_PREV_HASH_INVALID",
            Self::ChainLinkMismatch => "CHAIN_LINK_MISMATCH",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured verification error: a code, a message, optional details.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ProofError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ProofError {
    /// Create an error without details.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
