//! Conformance vectors for cross-implementation verification.
//!
//! Each vector was computed by an independent implementation and checked in
//! under `vectors/`. A conforming implementation reproduces every field of
//! `canonical_*` and `expected` byte-for-byte from `input`, `output`, and
//! `expected.prev_hash_hex`.

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use trustproof_core::{canonical_json, compute_entry_hash, event_material, sha256_hex};

/// The checked-in vector files, in chain order.
const VECTOR_SOURCES: [&str; 6] = [
    include_str!("../vectors/001_allow_genesis.json"),
    include_str!("../vectors/002_deny_linked.json"),
    include_str!("../vectors/003_unicode_literal.json"),
    include_str!("../vectors/004_escapes_and_scalars.json"),
    include_str!("../vectors/005_key_order.json"),
    include_str!("../vectors/006_numbers.json"),
];

/// A conformance vector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConformanceVector {
    pub id: String,
    pub description: String,
    /// Decision input: `subject`, `action`, `resource`, `policy`,
    /// `timestamp`, `jti`.
    pub input: Value,
    /// Decision output; becomes the claims `result`.
    pub output: Value,
    pub canonical_input: String,
    pub canonical_output: String,
    pub expected: Expected,
}

/// Expected values of a conformance vector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Expected {
    pub input_hash_hex: String,
    pub output_hash_hex: String,
    pub canonical_event_material: String,
    pub prev_hash_hex: String,
    pub entry_hash_hex: String,
}

/// A field that did not reproduce.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{vector}: {field} mismatch (expected {expected:?}, got {actual:?})")]
pub struct VectorMismatch {
    pub vector: String,
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

impl ConformanceVector {
    /// Event claims built from this vector, with the given attested hashes
    /// and no `chain` object.
    pub fn event_claims(&self, input_hash: &str, output_hash: &str) -> Value {
        json!({
            "subject": self.input["subject"],
            "action": self.input["action"],
            "resource": self.input["resource"],
            "policy": self.input["policy"],
            "result": self.output,
            "hashes": {
                "input_hash": input_hash,
                "output_hash": output_hash,
            },
            "timestamp": self.input["timestamp"],
            "jti": self.input["jti"],
        })
    }

    /// Complete claims carrying the expected hashes and chain link.
    pub fn linked_claims(&self) -> Value {
        let mut claims = self.event_claims(
            &self.expected.input_hash_hex,
            &self.expected.output_hash_hex,
        );
        claims["chain"] = json!({
            "prev_hash": self.expected.prev_hash_hex,
            "entry_hash": self.expected.entry_hash_hex,
        });
        claims
    }

    fn mismatch(&self, field: &'static str, expected: &str, actual: &str) -> VectorMismatch {
        VectorMismatch {
            vector: self.id.clone(),
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Load all conformance vectors.
pub fn all_vectors() -> Result<Vec<ConformanceVector>, serde_json::Error> {
    VECTOR_SOURCES
        .iter()
        .map(|source| serde_json::from_str(source))
        .collect()
}

/// Recompute every derived field of a vector and compare.
pub fn check_vector(vector: &ConformanceVector) -> Result<(), VectorMismatch> {
    let compare = |field: &'static str, expected: &str, actual: &str| {
        if expected == actual {
            Ok(())
        } else {
            Err(vector.mismatch(field, expected, actual))
        }
    };

    let canonical_input = canonical_json(&vector.input);
    compare("canonical_input", &vector.canonical_input, &canonical_input)?;

    let canonical_output = canonical_json(&vector.output);
    compare("canonical_output", &vector.canonical_output, &canonical_output)?;

    let input_hash = sha256_hex(canonical_input.as_bytes());
    compare("input_hash_hex", &vector.expected.input_hash_hex, &input_hash)?;

    let output_hash = sha256_hex(canonical_output.as_bytes());
    compare("output_hash_hex", &vector.expected.output_hash_hex, &output_hash)?;

    let claims = vector.event_claims(&input_hash, &output_hash);
    let material = claims
        .as_object()
        .ok_or_else(|| vector.mismatch("canonical_event_material", "object", "non-object"))
        .and_then(|claims| {
            event_material(claims).map_err(|e| {
                vector.mismatch(
                    "canonical_event_material",
                    &vector.expected.canonical_event_material,
                    &e.to_string(),
                )
            })
        })?;
    compare(
        "canonical_event_material",
        &vector.expected.canonical_event_material,
        &material,
    )?;

    let entry_hash = compute_entry_hash(&vector.expected.prev_hash_hex, material.as_bytes())
        .map_err(|e| {
            vector.mismatch("entry_hash_hex", &vector.expected.entry_hash_hex, &e.to_string())
        })?;
    compare("entry_hash_hex", &vector.expected.entry_hash_hex, &entry_hash.to_hex())
}
