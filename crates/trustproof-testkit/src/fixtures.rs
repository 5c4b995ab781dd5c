//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: keys, sample claims, issued
//! chains, and token tampering.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};

use trustproof::{
    append_with_options, Ed25519PublicKey, GenerateOptions, Keypair, Predecessor, VerifyConfig,
};
use trustproof_core::hash_json;

/// `iat` stamped on every fixture token, so tokens are reproducible.
pub const FIXED_IAT: i64 = 1_771_934_400; // 2026-02-24T12:00:00Z

/// A test fixture with a signing keypair.
pub struct TestFixture {
    pub keypair: Keypair,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// Get the keypair's public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    /// Generation options with the fixed `iat`.
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            key_id: None,
            issued_at: Some(FIXED_IAT),
        }
    }

    /// Link `claims` to `predecessor` and sign them.
    pub fn issue(&self, predecessor: Predecessor<'_>, claims: &Value) -> trustproof::Result<String> {
        append_with_options(predecessor, claims, &self.keypair, &self.options())
    }

    /// Issue a chain of `len` tokens over [`allow_claims`].
    pub fn issue_chain(&self, len: usize) -> trustproof::Result<Vec<String>> {
        let mut tokens: Vec<String> = Vec::with_capacity(len);
        for n in 0..len {
            let predecessor = match tokens.last() {
                Some(prev) => Predecessor::Token(prev),
                None => Predecessor::Genesis,
            };
            let token = self.issue(predecessor, &allow_claims(&format!("jti_{:04}", n)))?;
            tokens.push(token);
        }
        Ok(tokens)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures with distinct deterministic keys.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(seed)
        })
        .collect()
}

/// Verification config evaluated at [`FIXED_IAT`].
pub fn fixed_time_config() -> VerifyConfig {
    VerifyConfig {
        now: Some(FIXED_IAT),
        ..Default::default()
    }
}

/// The decision input behind [`allow_claims`].
pub fn sample_input() -> Value {
    json!({
        "subject": {"type": "user", "id": "user_123"},
        "action": "payout.initiate",
        "resource": {"type": "payout", "id": "po_001", "amount": {"value": 2500, "currency": "USD"}},
        "policy": {"id": "payout-policy", "version": "1.2.0"},
    })
}

/// The decision output behind [`allow_claims`].
pub fn sample_output() -> Value {
    json!({"decision": "allow", "reason_codes": ["within_limit"]})
}

/// Unlinked claims for an allowed payout, attesting to [`sample_input`] and
/// [`sample_output`].
pub fn allow_claims(jti: &str) -> Value {
    let input = sample_input();
    json!({
        "subject": input["subject"],
        "action": input["action"],
        "resource": input["resource"],
        "policy": input["policy"],
        "result": sample_output(),
        "hashes": {
            "input_hash": hash_json(&input).to_hex(),
            "output_hash": hash_json(&sample_output()).to_hex(),
        },
        "timestamp": "2026-02-24T12:00:00Z",
        "jti": jti,
    })
}

/// Flip one bit of a token's signature.
pub fn tamper_signature(token: &str) -> String {
    let (signing_input, signature) = token.rsplit_once('.').unwrap_or((token, ""));
    let mut raw = URL_SAFE_NO_PAD.decode(signature).unwrap_or_default();
    match raw.first_mut() {
        Some(byte) => *byte ^= 0x01,
        None => raw.push(0),
    }
    format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(raw))
}

/// Keep only the first `len` bytes of a token's signature.
pub fn truncate_signature(token: &str, len: usize) -> String {
    let (signing_input, signature) = token.rsplit_once('.').unwrap_or((token, ""));
    let raw = URL_SAFE_NO_PAD.decode(signature).unwrap_or_default();
    let keep = len.min(raw.len());
    format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(&raw[..keep]))
}

/// Sign arbitrary header and payload JSON, bypassing every generation check.
pub fn forge_token(header: &Value, payload: &Value, keypair: &Keypair) -> String {
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    );
    let signature = keypair.sign(signing_input.as_bytes());
    format!(
        "{}.{}",
        signing_input,
        URL_SAFE_NO_PAD.encode(signature.as_bytes())
    )
}
