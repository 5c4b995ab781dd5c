//! Claims schema validation.
//!
//! Malformed claims are the expected case here, not a programmer error:
//! every problem is reported as a [`ProofError`] and all checks run so the
//! caller sees the whole picture at once.

use serde_json::{json, Map, Value};

use crate::claims::REQUIRED_FIELDS;
use crate::error::{ErrorCode, ProofError};
use crate::types::is_hex64;

/// Validate a candidate claims value.
///
/// Returns an empty list when the claims are well-formed. Checks, in order:
/// 1. The value is an object (otherwise a single error, nothing else runs)
/// 2. Required fields are present (one error listing all missing names)
/// 3. `jti` is a non-blank string
/// 4. `hashes.input_hash` / `hashes.output_hash` are hex-64
/// 5. `chain.prev_hash` / `chain.entry_hash` are hex-64
pub fn validate_claims(value: &Value) -> Vec<ProofError> {
    let claims = match value.as_object() {
        Some(map) => map,
        None => {
            return vec![ProofError::new(
                ErrorCode::InvalidSchema,
                "Claims payload must be a JSON object.",
            )];
        }
    };

    let mut errors = Vec::new();

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !claims.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        errors.push(
            ProofError::new(
                ErrorCode::InvalidSchema,
                "Claims payload is missing required fields.",
            )
            .with_details(json!({ "missing_fields": missing })),
        );
    }

    if !has_jti(claims) {
        errors.push(ProofError::new(
            ErrorCode::MissingJti,
            "Claims payload must include a non-empty jti.",
        ));
    }

    check_hex_pair(claims, "hashes", ["input_hash", "output_hash"], &mut errors);
    check_hex_pair(claims, "chain", ["prev_hash", "entry_hash"], &mut errors);

    errors
}

/// Whether `claims.jti` is a string with non-whitespace content.
fn has_jti(claims: &Map<String, Value>) -> bool {
    matches!(claims.get("jti"), Some(Value::String(s)) if !is_blank(s))
}

/// Whether `s` is empty or only whitespace.
///
/// Whitespace here is Unicode `White_Space` plus the ASCII separators
/// U+001C..=U+001F, which other TrustProof implementations strip too.
pub fn is_blank(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
}

/// Check that `claims[object]` is an object whose two `fields` are hex-64.
fn check_hex_pair(
    claims: &Map<String, Value>,
    object: &str,
    fields: [&str; 2],
    errors: &mut Vec<ProofError>,
) {
    let inner = match claims.get(object).and_then(Value::as_object) {
        Some(inner) => inner,
        None => {
            errors.push(ProofError::new(
                ErrorCode::InvalidSchema,
                format!("claims.{} must be an object.", object),
            ));
            return;
        }
    };

    for field in fields {
        let ok = matches!(inner.get(field), Some(Value::String(s)) if is_hex64(s));
        if !ok {
            errors.push(ProofError::new(
                ErrorCode::InvalidSchema,
                format!("claims.{}.{} must be a 64-char hex string.", object, field),
            ));
        }
    }
}
