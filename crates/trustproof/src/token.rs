//! Compact token codec: `base64url(header).base64url(payload).base64url(sig)`.
//!
//! Tokens are JWS compact serializations signed with EdDSA over Ed25519. The
//! header is `{"alg":"EdDSA","typ":"JWT"}` plus an optional `kid`. The signing
//! input is the ASCII text of the first two segments joined by a dot.
//!
//! Decoding policy:
//! - exactly three segments, each unpadded base64url
//! - `alg` must be exactly `EdDSA`; any `crit` header is refused
//! - the signature must be 64 bytes and verify strictly
//! - the payload must be a JSON object
//! - registered time claims (`exp`, `nbf`, `iat`) are checked when present

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::VerifyConfig;
use crate::crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};

/// The only accepted `alg` header value.
pub const ALGORITHM: &str = "EdDSA";

/// The `typ` header value written on every token.
pub const TOKEN_TYPE: &str = "JWT";

/// Why a token failed to decode or verify.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token must have 3 dot-separated segments, found {0}")]
    Segments(usize),

    #[error("{0} segment is not valid base64url")]
    Base64(&'static str),

    #[error("{0} segment is not valid JSON")]
    Json(&'static str),

    #[error("{0} segment must be a JSON object")]
    NotAnObject(&'static str),

    #[error("unsupported algorithm: {0}")]
    Algorithm(String),

    #[error("unsupported critical header parameters")]
    CriticalHeader,

    #[error("signature must be 64 bytes, found {0}")]
    SignatureLength(usize),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("signature verification failed")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,

    #[error("{0} claim must be a number")]
    TimeClaim(&'static str),
}

#[derive(Serialize)]
struct Header<'a> {
    alg: &'a str,
    typ: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<&'a str>,
}

/// The three segments of a compact token, still encoded.
struct Segments<'a> {
    signing_input: &'a str,
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
}

/// Sign a payload object into a compact token.
pub fn encode(
    payload: &Map<String, Value>,
    keypair: &Keypair,
    key_id: Option<&str>,
) -> Result<String, serde_json::Error> {
    let header = serde_json::to_vec(&Header {
        alg: ALGORITHM,
        typ: TOKEN_TYPE,
        kid: key_id,
    })?;
    let payload = serde_json::to_vec(payload)?;

    let mut token = URL_SAFE_NO_PAD.encode(header);
    token.push('.');
    token.push_str(&URL_SAFE_NO_PAD.encode(payload));

    let signature = keypair.sign(token.as_bytes());
    token.push('.');
    token.push_str(&URL_SAFE_NO_PAD.encode(signature.as_bytes()));
    Ok(token)
}

/// Verify a token and return its payload.
pub fn verify(
    token: &str,
    key: &Ed25519PublicKey,
    config: &VerifyConfig,
) -> Result<Map<String, Value>, TokenError> {
    let segments = split(token)?;

    let header = decode_object(segments.header, "header")?;
    check_header(&header)?;

    let signature_bytes = URL_SAFE_NO_PAD
        .decode(segments.signature)
        .map_err(|_| TokenError::Base64("signature"))?;
    let signature = Ed25519Signature::from_slice(&signature_bytes)?;
    key.verify(segments.signing_input.as_bytes(), &signature)?;

    let payload = decode_object(segments.payload, "payload")?;
    if config.validate_time_claims {
        check_time_claims(&payload, config.now_secs(), config.leeway_secs)?;
    }
    Ok(payload)
}

/// Decode a token's payload WITHOUT checking its signature.
///
/// The header must still parse. Only for data the caller already trusts or
/// for diagnostics.
pub fn decode_unverified(token: &str) -> Result<Map<String, Value>, TokenError> {
    let segments = split(token)?;
    decode_object(segments.header, "header")?;
    decode_object(segments.payload, "payload")
}

/// Decode a token's payload for display, without verifying anything.
///
/// The result is untrusted: never treat it as a verification outcome.
pub fn inspect(token: &str) -> crate::Result<Value> {
    Ok(Value::Object(decode_unverified(token)?))
}

fn split(token: &str) -> Result<Segments<'_>, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Segments(parts.len()));
    }
    let signing_len = parts[0].len() + 1 + parts[1].len();
    Ok(Segments {
        signing_input: &token[..signing_len],
        header: parts[0],
        payload: parts[1],
        signature: parts[2],
    })
}

fn decode_object(segment: &str, name: &'static str) -> Result<Map<String, Value>, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Base64(name))?;
    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(TokenError::NotAnObject(name)),
        Err(_) => Err(TokenError::Json(name)),
    }
}

fn check_header(header: &Map<String, Value>) -> Result<(), TokenError> {
    match header.get("alg") {
        Some(Value::String(alg)) if alg == ALGORITHM => {}
        Some(Value::String(alg)) => return Err(TokenError::Algorithm(alg.clone())),
        Some(other) => return Err(TokenError::Algorithm(other.to_string())),
        None => return Err(TokenError::Algorithm("<missing>".to_string())),
    }
    if header.contains_key("crit") {
        return Err(TokenError::CriticalHeader);
    }
    Ok(())
}

fn check_time_claims(
    payload: &Map<String, Value>,
    now: i64,
    leeway_secs: u64,
) -> Result<(), TokenError> {
    let now = now as f64;
    let leeway = leeway_secs as f64;

    if let Some(exp) = payload.get("exp") {
        let exp = exp.as_f64().ok_or(TokenError::TimeClaim("exp"))?;
        if exp <= now - leeway {
            return Err(TokenError::Expired);
        }
    }
    if let Some(nbf) = payload.get("nbf") {
        let nbf = nbf.as_f64().ok_or(TokenError::TimeClaim("nbf"))?;
        if nbf > now + leeway {
            return Err(TokenError::NotYetValid);
        }
    }
    if let Some(iat) = payload.get("iat") {
        iat.as_f64().ok_or(TokenError::TimeClaim("iat"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_772_000_000;

    fn keypair() -> Keypair {
        Keypair::from_seed(&[42u8; 32])
    }

    fn config() -> VerifyConfig {
        VerifyConfig {
            now: Some(NOW),
            ..Default::default()
        }
    }

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    /// Sign arbitrary header and payload JSON.
    fn forge(header: &Value, payload: &Value, keypair: &Keypair) -> String {
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(header).unwrap()),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap())
        );
        let sig = keypair.sign(signing_input.as_bytes());
        format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(sig.as_bytes()))
    }

    #[test]
    fn test_encode_verify() {
        let kp = keypair();
        let claims = payload(json!({"jti": "a", "n": 1}));
        let token = encode(&claims, &kp, None).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(verify(&token, &kp.public_key(), &config()).unwrap(), claims);
    }

    #[test]
    fn test_header_shape() {
        let kp = keypair();
        let token = encode(&payload(json!({})), &kp, Some("key-2026")).unwrap();
        let header_segment = token.split('.').next().unwrap();
        let header: Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header_segment).unwrap()).unwrap();
        assert_eq!(header, json!({"alg": "EdDSA", "typ": "JWT", "kid": "key-2026"}));

        let token = encode(&payload(json!({})), &kp, None).unwrap();
        let header_segment = token.split('.').next().unwrap();
        let header: Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header_segment).unwrap()).unwrap();
        assert!(header.get("kid").is_none());
    }

    #[test]
    fn test_segment_count() {
        let key = keypair().public_key();
        assert_eq!(verify("", &key, &config()), Err(TokenError::Segments(1)));
        assert_eq!(verify("a.b", &key, &config()), Err(TokenError::Segments(2)));
        assert_eq!(verify("....", &key, &config()), Err(TokenError::Segments(5)));
    }

    #[test]
    fn test_bad_base64_and_json() {
        let key = keypair().public_key();
        assert_eq!(
            verify("a.b.c", &key, &config()),
            Err(TokenError::Base64("header"))
        );
        let not_json = URL_SAFE_NO_PAD.encode(b"not json");
        assert_eq!(
            verify(&format!("{}.e30.", not_json), &key, &config()),
            Err(TokenError::Json("header"))
        );
    }

    #[test]
    fn test_wrong_key() {
        let token = encode(&payload(json!({"jti": "a"})), &keypair(), None).unwrap();
        let other = Keypair::from_seed(&[43u8; 32]).public_key();
        assert_eq!(
            verify(&token, &other, &config()),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_algorithm_policy() {
        let kp = keypair();
        let body = json!({"jti": "a"});
        for alg in ["none", "HS256", "ES256", "eddsa"] {
            let token = forge(&json!({"alg": alg, "typ": "JWT"}), &body, &kp);
            assert_eq!(
                verify(&token, &kp.public_key(), &config()),
                Err(TokenError::Algorithm(alg.to_string()))
            );
        }
        let token = forge(&json!({"typ": "JWT"}), &body, &kp);
        assert!(matches!(
            verify(&token, &kp.public_key(), &config()),
            Err(TokenError::Algorithm(_))
        ));
    }

    #[test]
    fn test_crit_rejected() {
        let kp = keypair();
        let token = forge(
            &json!({"alg": "EdDSA", "typ": "JWT", "crit": ["exp"]}),
            &json!({"jti": "a"}),
            &kp,
        );
        assert_eq!(
            verify(&token, &kp.public_key(), &config()),
            Err(TokenError::CriticalHeader)
        );
    }

    #[test]
    fn test_truncated_signature() {
        let kp = keypair();
        let token = encode(&payload(json!({"jti": "a"})), &kp, None).unwrap();
        let (head, sig) = token.rsplit_once('.').unwrap();
        let raw = URL_SAFE_NO_PAD.decode(sig).unwrap();
        let truncated = format!("{}.{}", head, URL_SAFE_NO_PAD.encode(&raw[..40]));
        assert_eq!(
            verify(&truncated, &kp.public_key(), &config()),
            Err(TokenError::SignatureLength(40))
        );
    }

    #[test]
    fn test_payload_must_be_object() {
        let kp = keypair();
        let token = forge(&json!({"alg": "EdDSA"}), &json!([1, 2, 3]), &kp);
        assert_eq!(
            verify(&token, &kp.public_key(), &config()),
            Err(TokenError::NotAnObject("payload"))
        );
    }

    #[test]
    fn test_time_claims() {
        let kp = keypair();
        let key = kp.public_key();
        let header = json!({"alg": "EdDSA", "typ": "JWT"});

        let expired = forge(&header, &json!({"exp": NOW - 1}), &kp);
        assert_eq!(verify(&expired, &key, &config()), Err(TokenError::Expired));

        let lenient = VerifyConfig {
            leeway_secs: 30,
            ..config()
        };
        assert!(verify(&expired, &key, &lenient).is_ok());

        let unchecked = VerifyConfig {
            validate_time_claims: false,
            ..config()
        };
        assert!(verify(&expired, &key, &unchecked).is_ok());

        let future = forge(&header, &json!({"nbf": NOW + 60}), &kp);
        assert_eq!(verify(&future, &key, &config()), Err(TokenError::NotYetValid));

        let bad_iat = forge(&header, &json!({"iat": "yesterday"}), &kp);
        assert_eq!(
            verify(&bad_iat, &key, &config()),
            Err(TokenError::TimeClaim("iat"))
        );

        let fine = forge(&header, &json!({"iat": NOW, "exp": NOW + 60, "nbf": NOW}), &kp);
        assert!(verify(&fine, &key, &config()).is_ok());
    }

    #[test]
    fn test_decode_unverified_ignores_signature() {
        let kp = keypair();
        let token = encode(&payload(json!({"jti": "a"})), &kp, None).unwrap();
        let (head, _) = token.rsplit_once('.').unwrap();
        let unsigned = format!("{}.", head);
        assert_eq!(decode_unverified(&unsigned).unwrap()["jti"], json!("a"));
        assert_eq!(inspect(&unsigned).unwrap(), json!({"jti": "a"}));
        assert!(inspect("not-a-token").is_err());
    }
}
