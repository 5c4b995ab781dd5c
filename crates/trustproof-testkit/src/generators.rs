//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use trustproof::Keypair;
use trustproof_core::{hash_json, Hex64};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random Hex64.
pub fn hex64() -> impl Strategy<Value = Hex64> {
    any::<[u8; 32]>().prop_map(Hex64::from_bytes)
}

/// Generate a 64-char hex string in mixed case.
pub fn hex64_mixed_case() -> impl Strategy<Value = String> {
    "[0-9a-fA-F]{64}".prop_map(String::from)
}

/// Generate a non-blank jti.
pub fn jti() -> impl Strategy<Value = String> {
    "jti_[a-zA-Z0-9_-]{1,24}".prop_map(String::from)
}

/// Generate an object key, including non-ASCII.
pub fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ äöü日]{1,10}".prop_map(String::from)
}

/// Generate a scalar JSON value.
pub fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u32>().prop_map(|n| json!(n as f64 / 8.0)),
        any::<String>().prop_map(Value::String),
    ]
}

/// Generate a nested JSON value.
pub fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner, 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Generate a JSON object.
pub fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(key(), json_value(), 0..6)
        .prop_map(|entries| Value::Object(entries.into_iter().collect()))
}

/// Generate a string that may or may not look like a token.
pub fn token_like() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[A-Za-z0-9_.=+/$-]{0,64}".prop_map(String::from),
        prop::collection::vec("[A-Za-z0-9_-]{0,24}", 0..6).prop_map(|parts| parts.join(".")),
    ]
}

/// Parameters for generating a claims record.
#[derive(Debug, Clone)]
pub struct ClaimsParams {
    pub subject: Value,
    pub action: String,
    pub resource: Value,
    pub policy: Value,
    pub input: Value,
    pub output: Value,
    pub timestamp: String,
    pub jti: String,
    pub extensions: Value,
}

impl Arbitrary for ClaimsParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            json_object(),                   // subject
            "[a-z]{1,10}\\.[a-z]{1,10}",     // action
            json_object(),                   // resource
            json_object(),                   // policy
            json_value(),                    // input
            json_value(),                    // output
            "2026-0[1-9]-[12][0-9]T[01][0-9]:[0-5][0-9]:[0-5][0-9]Z",
            jti(),
            prop::collection::btree_map("x-[a-z]{1,8}", json_leaf(), 0..3),
        )
            .prop_map(
                |(subject, action, resource, policy, input, output, timestamp, jti, ext)| {
                    ClaimsParams {
                        subject,
                        action,
                        resource,
                        policy,
                        input,
                        output,
                        timestamp,
                        jti,
                        extensions: Value::Object(ext.into_iter().collect()),
                    }
                },
            )
            .boxed()
    }
}

/// Build unlinked claims (no `chain`) from parameters.
///
/// The attested hashes are computed from `input` and `output`, and `output`
/// becomes the claims `result`.
pub fn claims_from_params(params: &ClaimsParams) -> Value {
    let mut claims = json!({
        "subject": params.subject,
        "action": params.action,
        "resource": params.resource,
        "policy": params.policy,
        "result": params.output,
        "hashes": {
            "input_hash": hash_json(&params.input).to_hex(),
            "output_hash": hash_json(&params.output).to_hex(),
        },
        "timestamp": params.timestamp,
        "jti": params.jti,
    });
    if let (Some(claims), Some(ext)) = (claims.as_object_mut(), params.extensions.as_object()) {
        for (k, v) in ext {
            claims.insert(k.clone(), v.clone());
        }
    }
    claims
}
