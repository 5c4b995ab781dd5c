//! Proof generation: sign claims, and append claims to a chain.
//!
//! This is the trusted path. Claims arriving here come from the issuing
//! application, so problems are reported as [`Error`]s immediately rather than
//! accumulated.

use serde_json::{Map, Value};
use trustproof_core::{
    event_material, extract_prev_entry_hash, is_blank, is_hex64, link_entry_hash, Hex64,
};

use crate::config::{unix_now, GenerateOptions};
use crate::crypto::Keypair;
use crate::error::{Error, Result};
use crate::token;

/// What a new record links to.
#[derive(Debug, Clone, Copy)]
pub enum Predecessor<'a> {
    /// Start a new chain from the genesis sentinel.
    Genesis,
    /// A predecessor's claims object.
    Claims(&'a Value),
    /// A predecessor's token. Its payload is decoded without verifying the
    /// signature: the issuer is appending to its own chain.
    Token(&'a str),
}

impl<'a> Predecessor<'a> {
    /// Resolve the entry hash the successor's `chain.prev_hash` must carry.
    pub fn entry_hash(&self) -> Result<Hex64> {
        match self {
            Predecessor::Genesis => Ok(extract_prev_entry_hash(None)?),
            Predecessor::Claims(claims) => Ok(extract_prev_entry_hash(Some(*claims))?),
            Predecessor::Token(token) => {
                let payload = Value::Object(token::decode_unverified(token)?);
                Ok(extract_prev_entry_hash(Some(&payload))?)
            }
        }
    }
}

impl<'a> From<Option<&'a Value>> for Predecessor<'a> {
    fn from(claims: Option<&'a Value>) -> Self {
        match claims {
            Some(claims) => Predecessor::Claims(claims),
            None => Predecessor::Genesis,
        }
    }
}

/// Sign claims into a proof token.
///
/// The claims must already carry a non-blank `jti` and hex-64
/// `chain.prev_hash`/`chain.entry_hash`. The caller's value is not modified;
/// `iat` is added to the signed copy if absent.
pub fn generate(claims: &Value, keypair: &Keypair, key_id: Option<&str>) -> Result<String> {
    generate_with_options(claims, keypair, &GenerateOptions::with_key_id(key_id))
}

/// [`generate`] with explicit options.
pub fn generate_with_options(
    claims: &Value,
    keypair: &Keypair,
    options: &GenerateOptions,
) -> Result<String> {
    let mut payload = claims
        .as_object()
        .cloned()
        .ok_or_else(|| Error::InvalidClaims("claims must be a JSON object".to_string()))?;
    check_signable(&payload)?;

    if !payload.contains_key("iat") {
        let iat = options.issued_at.unwrap_or_else(unix_now);
        payload.insert("iat".to_string(), Value::from(iat));
    }

    let token = token::encode(&payload, keypair, options.key_id.as_deref())?;
    let jti = payload.get("jti").and_then(Value::as_str).unwrap_or_default();
    tracing::debug!(
        jti,
        has_kid = options.key_id.is_some(),
        "generated proof"
    );
    Ok(token)
}

/// Link claims to a predecessor and sign them.
///
/// Sets `chain.prev_hash` to the predecessor's entry hash (or the genesis
/// sentinel) and `chain.entry_hash` to the hash over the new event material.
/// Other keys already in the caller's `chain` object are kept.
pub fn append(
    predecessor: Predecessor<'_>,
    next_claims: &Value,
    keypair: &Keypair,
    key_id: Option<&str>,
) -> Result<String> {
    append_with_options(
        predecessor,
        next_claims,
        keypair,
        &GenerateOptions::with_key_id(key_id),
    )
}

/// [`append`] with explicit options.
pub fn append_with_options(
    predecessor: Predecessor<'_>,
    next_claims: &Value,
    keypair: &Keypair,
    options: &GenerateOptions,
) -> Result<String> {
    let prev_hash = predecessor.entry_hash()?;
    let linked = link(prev_hash, next_claims)?;
    generate_with_options(&linked, keypair, options)
}

/// Fill in the chain fields of `claims` for a record following `prev_hash`.
pub fn link(prev_hash: Hex64, claims: &Value) -> Result<Value> {
    let mut claims = claims
        .as_object()
        .cloned()
        .ok_or_else(|| Error::InvalidClaims("next claims must be a JSON object".to_string()))?;

    let mut chain = match claims.remove("chain") {
        Some(Value::Object(chain)) => chain,
        _ => Map::new(),
    };
    chain.insert("prev_hash".to_string(), Value::from(prev_hash.to_hex()));

    let material = event_material(&claims)?;
    let entry_hash = link_entry_hash(&prev_hash, material.as_bytes());
    chain.insert("entry_hash".to_string(), Value::from(entry_hash.to_hex()));

    claims.insert("chain".to_string(), Value::Object(chain));
    Ok(Value::Object(claims))
}

/// Pre-sign checks: `jti` and the chain hashes.
fn check_signable(claims: &Map<String, Value>) -> Result<()> {
    match claims.get("jti") {
        Some(Value::String(jti)) if !is_blank(jti) => {}
        _ => {
            return Err(Error::InvalidClaims(
                "jti must be a non-empty string".to_string(),
            ))
        }
    }

    let chain = claims
        .get("chain")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::InvalidClaims("chain must be an object".to_string()))?;

    for field in ["prev_hash", "entry_hash"] {
        let ok = matches!(chain.get(field), Some(Value::String(s)) if is_hex64(s));
        if !ok {
            return Err(Error::InvalidClaims(format!(
                "chain.{} must be a 64-char hex string",
                field
            )));
        }
    }
    Ok(())
}
