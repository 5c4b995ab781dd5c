//! Canonical JSON encoding for deterministic hashing.
//!
//! Every hash in TrustProof is computed over this encoding:
//! - Object keys sorted by their UTF-8 bytes (equivalently, by code point)
//! - No whitespace between tokens
//! - Non-ASCII characters emitted as literal UTF-8
//! - `"` and `\` escaped; `\b \f \n \r \t` use their short forms; every
//!   other control character below U+0020 is `\u00xx` with lowercase hex
//! - Integers exactly as written, at any magnitude (`-0` becomes `0`)
//! - Other numbers as the shortest round-trip float, positional when the
//!   decimal exponent is in `-4..16` and `1e-07` style otherwise
//!
//! This matches `json.dumps(v, sort_keys=True, separators=(",", ":"),
//! ensure_ascii=False)`, the encoding the other TrustProof implementations
//! use.
//!
//! **CRITICAL**: This encoding is FROZEN. Changes silently break every
//! entry hash and every cross-implementation verification.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

use crate::digest::sha256;
use crate::error::CoreError;
use crate::types::Hex64;

/// Encode a JSON value canonically.
///
/// Object key order does not depend on how the `Value` was built, even if
/// serde_json's `preserve_order` feature is enabled elsewhere in the build.
pub fn canonical_json(value: &Value) -> String {
    let mut buf = String::new();
    encode_value(&mut buf, value);
    buf
}

/// Encode any serializable value canonically.
///
/// Fails with [`CoreError::Encoding`] for values JSON cannot represent,
/// such as maps with non-string keys.
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CoreError> {
    let value = serde_json::to_value(value).map_err(|e| CoreError::Encoding(e.to_string()))?;
    Ok(canonical_json(&value))
}

/// Canonicalize then digest: the hash callers put in `hashes.input_hash`
/// and `hashes.output_hash`.
pub fn hash_json(value: &Value) -> Hex64 {
    sha256(canonical_json(value).as_bytes())
}

/// Recursively encode a JSON value.
fn encode_value(buf: &mut String, value: &Value) {
    match value {
        Value::Null => buf.push_str("null"),
        Value::Bool(true) => buf.push_str("true"),
        Value::Bool(false) => buf.push_str("false"),
        Value::Number(n) => encode_number(buf, n),
        Value::String(s) => encode_string(buf, s),
        Value::Array(items) => {
            buf.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(',');
                }
                encode_value(buf, item);
            }
            buf.push(']');
        }
        Value::Object(map) => encode_object(buf, map),
    }
}

/// Encode an object with keys sorted by byte comparison.
fn encode_object(buf: &mut String, map: &serde_json::Map<String, Value>) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    buf.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        encode_string(buf, key);
        buf.push(':');
        encode_value(buf, value);
    }
    buf.push('}');
}

/// Encode a number.
///
/// The text comes from serde_json, which keeps the literal as parsed
/// (`arbitrary_precision`), so integer digits survive untouched.
fn encode_number(buf: &mut String, n: &serde_json::Number) {
    let text = n.to_string();
    let digits = text.strip_prefix('-').unwrap_or(text.as_str());
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if digits.bytes().all(|b| b == b'0') {
            buf.push('0');
        } else {
            buf.push_str(&text);
        }
        return;
    }
    match text.parse::<f64>() {
        Ok(f) => encode_float(buf, f),
        Err(_) => buf.push_str(&text),
    }
}

/// Encode a float in shortest round-trip form.
fn encode_float(buf: &mut String, f: f64) {
    if f.is_nan() {
        buf.push_str("NaN");
        return;
    }
    if f.is_infinite() {
        buf.push_str(if f < 0.0 { "-Infinity" } else { "Infinity" });
        return;
    }
    if f.is_sign_negative() {
        buf.push('-');
    }
    if f == 0.0 {
        buf.push_str("0.0");
        return;
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. `1.25e-7`.
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..16).contains(&exp) {
        let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
        if exp < 0 {
            buf.push_str("0.");
            for _ in 0..(-exp - 1) {
                buf.push('0');
            }
            buf.push_str(&digits);
        } else {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                buf.push_str(&digits);
                for _ in digits.len()..int_len {
                    buf.push('0');
                }
                buf.push_str(".0");
            } else {
                buf.push_str(&digits[..int_len]);
                buf.push('.');
                buf.push_str(&digits[int_len..]);
            }
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        let _ = write!(buf, "{}e{}{:02}", mantissa, sign, exp.abs());
    }
}

/// Encode a string literal.
fn encode_string(buf: &mut String, s: &str) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            '\u{08}' => buf.push_str("\\b"),
            '\u{0c}' => buf.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => buf.push(c),
        }
    }
    buf.push('"');
}
