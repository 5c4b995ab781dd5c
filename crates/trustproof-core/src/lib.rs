//! # TrustProof Core
//!
//! Pure primitives for TrustProof: canonical JSON, digests, claims, and chain
//! linking.
//!
//! This crate contains no signing, no clock, no I/O. It is pure computation
//! over JSON values and SHA-256.
//!
//! ## Key Types
//!
//! - [`Claims`] - A schema-validated claims record
//! - [`Hex64`] - A 32-byte digest with a 64-char lowercase hex form
//! - [`ProofError`] - A structured verification error with a stable [`ErrorCode`]
//!
//! ## Canonicalization
//!
//! Every hash is computed over canonical JSON. See [`canonical`] module.

pub mod canonical;
pub mod chain;
pub mod claims;
pub mod digest;
pub mod error;
pub mod types;
pub mod validation;

pub use canonical::{canonical_json, hash_json, to_canonical_json};
pub use chain::{
    compute_entry_hash, event_material, extract_prev_entry_hash, link_entry_hash,
    GENESIS_PREV_HASH,
};
pub use claims::{AttestedHashes, ChainLink, Claims, EVENT_FIELDS, REQUIRED_FIELDS};
pub use digest::{sha256, sha256_hex};
pub use error::{CoreError, ErrorCode, ProofError};
pub use types::{is_hex64, Hex64};
pub use validation::{is_blank, validate_claims};
