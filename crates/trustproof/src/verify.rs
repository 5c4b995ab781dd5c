//! Proof verification: signature, schema, and attested hashes.
//!
//! This is the untrusted path. Nothing here returns `Err` or panics on
//! adversarial input; every failure becomes a [`ProofError`] inside a
//! [`VerifyOutcome::Invalid`].

use serde_json::{json, Map, Value};
use std::fmt;

use trustproof_core::{hash_json, validate_claims, Claims, ErrorCode, ProofError};

use crate::config::VerifyConfig;
use crate::crypto::Ed25519PublicKey;
use crate::token;

/// The result of verifying one proof token.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    /// Signature, schema, and any expected hashes all check out.
    Valid(Claims),
    /// At least one check failed.
    Invalid(Rejection),
}

impl VerifyOutcome {
    /// Check if the proof verified.
    pub fn is_valid(&self) -> bool {
        matches!(self, VerifyOutcome::Valid(_))
    }

    /// The verified claims, if valid.
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            VerifyOutcome::Valid(claims) => Some(claims),
            VerifyOutcome::Invalid(_) => None,
        }
    }

    /// The rejection, if invalid.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            VerifyOutcome::Valid(_) => None,
            VerifyOutcome::Invalid(rejection) => Some(rejection),
        }
    }

    /// All errors; empty when valid.
    pub fn errors(&self) -> &[ProofError] {
        match self {
            VerifyOutcome::Valid(_) => &[],
            VerifyOutcome::Invalid(rejection) => rejection.errors(),
        }
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<Claims, Rejection> {
        match self {
            VerifyOutcome::Valid(claims) => Ok(claims),
            VerifyOutcome::Invalid(rejection) => Err(rejection),
        }
    }

    /// Render as `{ok, claims?, errors}` for host tooling.
    pub fn to_report(&self) -> Value {
        let mut report = Map::new();
        report.insert("ok".to_string(), Value::Bool(self.is_valid()));
        let claims = match self {
            VerifyOutcome::Valid(claims) => Some(Value::Object(claims.as_object().clone())),
            VerifyOutcome::Invalid(rejection) => rejection.claims.clone(),
        };
        if let Some(claims) = claims {
            report.insert("claims".to_string(), claims);
        }
        report.insert("errors".to_string(), json!(self.errors()));
        Value::Object(report)
    }
}

/// Why a proof was rejected.
///
/// Never holds an empty error list.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    errors: Vec<ProofError>,
    claims: Option<Value>,
}

impl Rejection {
    fn new(errors: Vec<ProofError>, claims: Option<Value>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors, claims }
    }

    /// The errors, in the order they were found.
    pub fn errors(&self) -> &[ProofError] {
        &self.errors
    }

    /// The error codes, in order.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }

    /// Whether any error carries `code`.
    pub fn has(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// The decoded payload, present whenever the signature verified.
    ///
    /// Surfaced for diagnostics only; it did not pass verification.
    pub fn claims(&self) -> Option<&Value> {
        self.claims.as_ref()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proof rejected: ")?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Rejection {}

/// Verify a proof token.
///
/// `expected_input`/`expected_output`, when given, are canonicalized and
/// hashed, then compared case-insensitively with the attested hashes.
pub fn verify(
    token: &str,
    key: &Ed25519PublicKey,
    expected_input: Option<&Value>,
    expected_output: Option<&Value>,
) -> VerifyOutcome {
    verify_with_config(
        token,
        key,
        expected_input,
        expected_output,
        &VerifyConfig::default(),
    )
}

/// [`verify`] with explicit configuration.
pub fn verify_with_config(
    token: &str,
    key: &Ed25519PublicKey,
    expected_input: Option<&Value>,
    expected_output: Option<&Value>,
    config: &VerifyConfig,
) -> VerifyOutcome {
    let payload = match token::verify(token, key, config) {
        Ok(payload) => Value::Object(payload),
        Err(e) => {
            tracing::debug!(error = %e, "proof signature rejected");
            let error = ProofError::new(
                ErrorCode::InvalidSignature,
                "JWT signature verification failed.",
            )
            .with_details(Value::String(e.to_string()));
            return VerifyOutcome::Invalid(Rejection::new(vec![error], None));
        }
    };

    let mut errors = validate_claims(&payload);

    if let Some(expected) = expected_input {
        check_attested_hash(
            &payload,
            "input_hash",
            expected,
            ErrorCode::InputHashMismatch,
            "Computed input hash does not match claims.hashes.input_hash.",
            &mut errors,
        );
    }
    if let Some(expected) = expected_output {
        check_attested_hash(
            &payload,
            "output_hash",
            expected,
            ErrorCode::OutputHashMismatch,
            "Computed output hash does not match claims.hashes.output_hash.",
            &mut errors,
        );
    }

    if !errors.is_empty() {
        let rejection = Rejection::new(errors, Some(payload));
        tracing::debug!(codes = ?rejection.codes(), "proof rejected");
        return VerifyOutcome::Invalid(rejection);
    }

    match Claims::parse(payload) {
        Ok(claims) => {
            tracing::debug!(jti = claims.jti(), "proof verified");
            VerifyOutcome::Valid(claims)
        }
        Err(errors) => VerifyOutcome::Invalid(Rejection::new(errors, None)),
    }
}

fn check_attested_hash(
    payload: &Value,
    field: &str,
    expected: &Value,
    code: ErrorCode,
    message: &str,
    errors: &mut Vec<ProofError>,
) {
    let expected_hash = hash_json(expected).to_hex();
    let actual = payload.get("hashes").and_then(|hashes| hashes.get(field));
    let matches = matches!(
        actual,
        Some(Value::String(actual)) if actual.eq_ignore_ascii_case(&expected_hash)
    );
    if !matches {
        let actual_hash = match actual {
            Some(Value::String(s)) => Value::String(s.clone()),
            _ => Value::Null,
        };
        errors.push(ProofError::new(code, message).with_details(json!({
            "expected_hash": expected_hash,
            "actual_hash": actual_hash,
        })));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::generate::{append, Predecessor};

    fn keypair() -> Keypair {
        Keypair::from_seed(&[5u8; 32])
    }

    fn input() -> Value {
        json!({"amount": 1250, "currency": "USD", "account": "acct_1"})
    }

    fn output() -> Value {
        json!({"decision": "allow", "limit_remaining": 8750})
    }

    fn claims() -> Value {
        json!({
            "subject": {"type": "agent", "id": "payout-bot"},
            "action": "payout.initiate",
            "resource": {"type": "payout", "id": "po_77"},
            "policy": {"id": "payout-policy", "version": 2},
            "result": output(),
            "hashes": {
                "input_hash": hash_json(&input()).to_hex().to_uppercase(),
                "output_hash": hash_json(&output()).to_hex(),
            },
            "timestamp": "2026-06-01T08:00:00Z",
            "jti": "jti_po_77"
        })
    }

    fn token() -> String {
        append(Predecessor::Genesis, &claims(), &keypair(), None).unwrap()
    }

    #[test]
    fn test_valid_with_expected_hashes() {
        let outcome = verify(
            &token(),
            &keypair().public_key(),
            Some(&input()),
            Some(&output()),
        );
        assert!(outcome.is_valid());
        assert!(outcome.errors().is_empty());

        let claims = outcome.claims().unwrap();
        assert_eq!(claims.jti(), "jti_po_77");
        assert!(claims.issued_at().is_some());
        assert_eq!(claims.hashes().input_hash, hash_json(&input()));
    }

    #[test]
    fn test_wrong_key_is_invalid_signature() {
        let other = Keypair::from_seed(&[6u8; 32]).public_key();
        let outcome = verify(&token(), &other, None, None);
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.codes(), vec![ErrorCode::InvalidSignature]);
        assert!(rejection.claims().is_none());
        assert_eq!(
            rejection.errors()[0].message,
            "JWT signature verification failed."
        );
        assert!(rejection.errors()[0].details.is_some());
    }

    #[test]
    fn test_hash_mismatches_accumulate_with_claims() {
        let outcome = verify(
            &token(),
            &keypair().public_key(),
            Some(&json!({"amount": 1})),
            Some(&json!({"decision": "deny"})),
        );
        let rejection = outcome.rejection().unwrap();
        assert_eq!(
            rejection.codes(),
            vec![ErrorCode::InputHashMismatch, ErrorCode::OutputHashMismatch]
        );
        assert_eq!(rejection.claims().unwrap()["jti"], json!("jti_po_77"));

        let details = rejection.errors()[0].details.as_ref().unwrap();
        assert_eq!(
            details["expected_hash"],
            json!(hash_json(&json!({"amount": 1})).to_hex())
        );
        assert_eq!(
            details["actual_hash"],
            json!(hash_json(&input()).to_hex().to_uppercase())
        );
    }

    #[test]
    fn test_report_shapes() {
        let key = keypair().public_key();
        let valid = verify(&token(), &key, None, None).to_report();
        assert_eq!(valid["ok"], json!(true));
        assert_eq!(valid["errors"], json!([]));
        assert_eq!(valid["claims"]["jti"], json!("jti_po_77"));

        let invalid = verify("a.b.c", &key, None, None).to_report();
        assert_eq!(invalid["ok"], json!(false));
        assert!(invalid.get("claims").is_none());
        assert_eq!(invalid["errors"][0]["code"], json!("INVALID_SIGNATURE"));
    }

    #[test]
    fn test_into_result_and_display() {
        let key = Keypair::from_seed(&[6u8; 32]).public_key();
        let err = verify(&token(), &key, None, None).into_result().unwrap_err();
        assert!(err.to_string().starts_with("proof rejected: INVALID_SIGNATURE"));
        assert!(err.has(ErrorCode::InvalidSignature));
    }
}
