//! Claims: the structured statement a proof token attests to.
//!
//! A claims record is a JSON object. The attested hashes and chain linkage are
//! typed; everything else (`subject`, `resource`, `policy`, `result`, and any
//! extension fields) is opaque JSON carried through verbatim.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::chain::{event_material, link_entry_hash};
use crate::error::{ErrorCode, ProofError};
use crate::types::Hex64;
use crate::validation::validate_claims;

/// Top-level fields every claims record must carry.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "subject",
    "action",
    "resource",
    "policy",
    "result",
    "hashes",
    "timestamp",
    "jti",
    "chain",
];

/// Fields covered by the event material, in no particular order (the
/// canonical encoding sorts them).
pub const EVENT_FIELDS: [&str; 8] = [
    "subject",
    "action",
    "resource",
    "policy",
    "result",
    "hashes",
    "timestamp",
    "jti",
];

static NULL: Value = Value::Null;

/// The digests of the canonical input and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttestedHashes {
    pub input_hash: Hex64,
    pub output_hash: Hex64,
}

/// A record's position in a hash chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainLink {
    /// Entry hash of the predecessor, or the genesis sentinel.
    pub prev_hash: Hex64,
    /// `sha256(prev_hash || event_material)`.
    pub entry_hash: Hex64,
}

impl ChainLink {
    /// Whether this link claims to start a chain.
    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_zero()
    }
}

/// A claims record that passed schema validation.
///
/// The only way to obtain one is [`Claims::parse`], so holding a `Claims`
/// means every required field is present and the hashes are well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    raw: Map<String, Value>,
    hashes: AttestedHashes,
    chain: ChainLink,
}

impl Claims {
    /// Validate a JSON value and wrap it.
    ///
    /// On failure returns every schema problem found, never an empty list.
    pub fn parse(value: Value) -> Result<Self, Vec<ProofError>> {
        let errors = validate_claims(&value);
        if !errors.is_empty() {
            return Err(errors);
        }

        let raw = match value {
            Value::Object(map) => map,
            _ => {
                return Err(vec![ProofError::new(
                    ErrorCode::InvalidSchema,
                    "Claims payload must be a JSON object.",
                )])
            }
        };
        let hashes = AttestedHashes {
            input_hash: hex_at(&raw, "hashes", "input_hash")?,
            output_hash: hex_at(&raw, "hashes", "output_hash")?,
        };
        let chain = ChainLink {
            prev_hash: hex_at(&raw, "chain", "prev_hash")?,
            entry_hash: hex_at(&raw, "chain", "entry_hash")?,
        };

        Ok(Self { raw, hashes, chain })
    }

    /// The unique token identifier.
    pub fn jti(&self) -> &str {
        self.raw.get("jti").and_then(Value::as_str).unwrap_or_default()
    }

    /// The attested input/output hashes, lowercase-normalized.
    pub fn hashes(&self) -> &AttestedHashes {
        &self.hashes
    }

    /// The chain linkage, lowercase-normalized.
    pub fn chain(&self) -> &ChainLink {
        &self.chain
    }

    /// The issued-at time in Unix seconds, if present and integral.
    pub fn issued_at(&self) -> Option<i64> {
        self.raw.get("iat").and_then(Value::as_i64)
    }

    pub fn subject(&self) -> &Value {
        self.field("subject")
    }

    pub fn action(&self) -> &Value {
        self.field("action")
    }

    pub fn resource(&self) -> &Value {
        self.field("resource")
    }

    pub fn policy(&self) -> &Value {
        self.field("policy")
    }

    pub fn result(&self) -> &Value {
        self.field("result")
    }

    pub fn timestamp(&self) -> &Value {
        self.field("timestamp")
    }

    /// Look up any field, including extensions.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.raw.get(field)
    }

    /// The claims as a JSON object, exactly as decoded.
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Convert back into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.raw)
    }

    /// The canonical event material of this record.
    ///
    /// Uses the fields as decoded (original hex case, any extra keys inside
    /// `hashes`), which is what the issuer hashed.
    pub fn event_material(&self) -> String {
        // All event fields are required, so this cannot fail.
        event_material(&self.raw).unwrap_or_default()
    }

    /// Recompute the entry hash from this record's own `prev_hash`.
    pub fn recompute_entry_hash(&self) -> Hex64 {
        link_entry_hash(&self.chain.prev_hash, self.event_material().as_bytes())
    }

    fn field(&self, name: &str) -> &Value {
        self.raw.get(name).unwrap_or(&NULL)
    }
}

impl Serialize for Claims {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl From<Claims> for Value {
    fn from(claims: Claims) -> Self {
        claims.into_value()
    }
}

fn hex_at(raw: &Map<String, Value>, object: &str, field: &str) -> Result<Hex64, Vec<ProofError>> {
    raw.get(object)
        .and_then(|inner| inner.get(field))
        .and_then(Value::as_str)
        .and_then(|s| Hex64::parse(s).ok())
        .ok_or_else(|| {
            vec![ProofError::new(
                ErrorCode::InvalidSchema,
                format!("claims.{}.{} must be a 64-char hex string.", object, field),
            )]
        })
}
