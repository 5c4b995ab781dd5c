//! Chain linking: event material, entry hashes, and the genesis sentinel.
//!
//! Each record binds to its predecessor through
//! `entry_hash = sha256(lowercase(prev_hash) || event_material)`, where the
//! event material is the canonical encoding of the eight event fields (chain
//! fields excluded). Nothing here signs or verifies; it is pure hashing.

use serde_json::{Map, Value};

use crate::canonical::canonical_json;
use crate::claims::EVENT_FIELDS;
use crate::digest::sha256;
use crate::error::CoreError;
use crate::types::Hex64;

/// The `prev_hash` of the first record in a chain.
pub const GENESIS_PREV_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Canonical event material of a claims object.
///
/// Fails with [`CoreError::MissingField`] if any event field is absent.
pub fn event_material(claims: &Map<String, Value>) -> Result<String, CoreError> {
    let mut event = Map::new();
    for field in EVENT_FIELDS {
        let value = claims.get(field).ok_or(CoreError::MissingField(field))?;
        event.insert(field.to_string(), value.clone());
    }
    Ok(canonical_json(&Value::Object(event)))
}

/// Compute an entry hash from a hex `prev_hash` and event material bytes.
///
/// `prev_hash_hex` must be 64 hex characters (either case); anything else is
/// a caller bug and fails with [`CoreError::InvalidHex`].
pub fn compute_entry_hash(prev_hash_hex: &str, event_material: &[u8]) -> Result<Hex64, CoreError> {
    let prev = Hex64::parse_field(prev_hash_hex, "prev_hash_hex")?;
    Ok(link_entry_hash(&prev, event_material))
}

/// Compute an entry hash from an already-parsed `prev_hash`.
pub fn link_entry_hash(prev_hash: &Hex64, event_material: &[u8]) -> Hex64 {
    let mut preimage = Vec::with_capacity(64 + event_material.len());
    preimage.extend_from_slice(prev_hash.to_hex().as_bytes());
    preimage.extend_from_slice(event_material);
    sha256(&preimage)
}

/// The `prev_hash` a successor of `predecessor` should carry.
///
/// `None` means the successor starts a chain and gets the genesis sentinel.
/// Otherwise the predecessor must be an object with a hex-64
/// `chain.entry_hash`.
pub fn extract_prev_entry_hash(predecessor: Option<&Value>) -> Result<Hex64, CoreError> {
    let predecessor = match predecessor {
        None => return Ok(Hex64::ZERO),
        Some(value) => value,
    };

    let claims = predecessor.as_object().ok_or_else(|| {
        CoreError::InvalidPredecessor("predecessor must be an object".to_string())
    })?;
    let chain = claims
        .get("chain")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            CoreError::InvalidPredecessor("predecessor is missing chain object".to_string())
        })?;

    match chain.get("entry_hash").and_then(Value::as_str) {
        Some(entry_hash) => Hex64::parse_field(entry_hash, "predecessor chain.entry_hash"),
        None => Err(CoreError::InvalidHex {
            field: "predecessor chain.entry_hash".to_string(),
        }),
    }
}
