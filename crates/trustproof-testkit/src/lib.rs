//! # TrustProof Testkit
//!
//! Testing utilities for TrustProof.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Conformance vectors**: Fixtures computed by an independent implementation
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Keys, sample claims, issued chains, and token tampering
//!
//! ## Conformance Vectors
//!
//! Vectors pin the canonical encoding and hash chain across implementations:
//!
//! ```rust
//! use trustproof_testkit::vectors::{all_vectors, check_vector};
//!
//! for vector in all_vectors().unwrap() {
//!     check_vector(&vector).unwrap();
//!     println!("{}: {}", vector.id, vector.expected.entry_hash_hex);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use trustproof_testkit::generators::{claims_from_params, ClaimsParams};
//!
//! proptest! {
//!     #[test]
//!     fn canonical_form_is_deterministic(params: ClaimsParams) {
//!         let c1 = claims_from_params(&params);
//!         let c2 = claims_from_params(&params);
//!         prop_assert_eq!(canonical_json(&c1), canonical_json(&c2));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use trustproof_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let chain = fixture.issue_chain(3).unwrap();
//! assert_eq!(chain.len(), 3);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture};
pub use vectors::{all_vectors, check_vector, ConformanceVector};
