//! Error types for proof generation.
//!
//! Generation is the trusted path: a caller handing us malformed claims is a
//! bug on their side and surfaces as an [`Error`]. Verification never returns
//! one of these; see [`crate::VerifyOutcome`] and [`crate::ChainOutcome`].

use thiserror::Error;
use trustproof_core::CoreError;

use crate::token::TokenError;

/// Errors that can occur while generating or decoding proofs.
#[derive(Debug, Error)]
pub enum Error {
    /// Claims cannot be signed as given.
    #[error("invalid claims: {0}")]
    InvalidClaims(String),

    /// Core primitive error (hex contract, predecessor, event material).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A token could not be decoded.
    #[error("malformed token: {0}")]
    MalformedToken(#[from] TokenError),
}

/// Result type for proof operations.
pub type Result<T> = std::result::Result<T, Error>;
