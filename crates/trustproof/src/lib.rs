//! # TrustProof
//!
//! Signed, hash-chained proof tokens for automated decisions.
//!
//! ## Overview
//!
//! A proof token attests that a subject performed an action on a resource
//! under a policy, with a result. It carries:
//!
//! - **Hashes**: SHA-256 digests of the canonical input and output
//! - **Chain**: a link to the previous proof's entry hash
//! - **Signature**: EdDSA (Ed25519) over a compact JWS
//!
//! ## Key Concepts
//!
//! - **Generation is trusted**: malformed claims are a caller bug and fail
//!   with an [`Error`].
//! - **Verification is untrusted**: it never fails; it returns a
//!   [`VerifyOutcome`] or [`ChainOutcome`] describing every problem found.
//! - **Entry hash**: `sha256(prev_hash || event_material)`, binding each proof
//!   to its predecessor.
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use trustproof::{append, hash_json, verify, verify_chain, Keypair, Predecessor};
//!
//! let keypair = Keypair::generate();
//! let input = json!({"amount": 100});
//! let output = json!({"decision": "allow"});
//!
//! let claims = json!({
//!     "subject": {"type": "agent", "id": "payout-bot"},
//!     "action": "payout.initiate",
//!     "resource": {"type": "payout", "id": "po_1"},
//!     "policy": {"id": "payout-policy"},
//!     "result": output,
//!     "hashes": {
//!         "input_hash": hash_json(&input).to_hex(),
//!         "output_hash": hash_json(&output).to_hex(),
//!     },
//!     "timestamp": "2026-02-24T12:00:00Z",
//!     "jti": "jti_1",
//! });
//!
//! let token = append(Predecessor::Genesis, &claims, &keypair, None).unwrap();
//!
//! let outcome = verify(&token, &keypair.public_key(), Some(&input), Some(&output));
//! assert!(outcome.is_valid());
//!
//! let chain = verify_chain(&[token], &keypair.public_key());
//! assert!(chain.is_intact());
//! ```
//!
//! ## Re-exports
//!
//! - `trustproof::core` - Core primitives (canonical JSON, claims, chain linking)

pub mod chain;
pub mod config;
pub mod crypto;
pub mod error;
pub mod generate;
pub mod token;
pub mod verify;

// Re-export the core crate
pub use trustproof_core as core;

// Re-export main types for convenience
pub use chain::{verify_chain, verify_chain_with_config, ChainBreak, ChainOutcome};
pub use config::{GenerateOptions, VerifyConfig};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{Error, Result};
pub use generate::{
    append, append_with_options, generate, generate_with_options, link, Predecessor,
};
pub use token::{inspect, TokenError};
pub use verify::{verify, verify_with_config, Rejection, VerifyOutcome};

// Re-export commonly used core types
pub use trustproof_core::{
    canonical_json, compute_entry_hash, hash_json, sha256_hex, Claims, ErrorCode, Hex64,
    ProofError, GENESIS_PREV_HASH,
};
