//! Configuration for generating and verifying proofs.

use std::time::{SystemTime, UNIX_EPOCH};

/// Configuration for proof and chain verification.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Whether to enforce the registered JWT time claims (`exp`, `nbf`, `iat`).
    pub validate_time_claims: bool,
    /// Clock skew allowance for `exp` and `nbf`, in seconds.
    pub leeway_secs: u64,
    /// Evaluation time in Unix seconds. `None` reads the system clock.
    pub now: Option<i64>,
    /// The `prev_hash` required at index 0 of a chain. `None` means the
    /// all-zero genesis sentinel.
    pub expected_genesis_prev_hash: Option<String>,
    /// Verify chain signatures concurrently before the linkage pass.
    pub parallel_signatures: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            validate_time_claims: true,
            leeway_secs: 0,
            now: None,
            expected_genesis_prev_hash: None,
            parallel_signatures: false,
        }
    }
}

impl VerifyConfig {
    /// The evaluation time for time claims.
    pub fn now_secs(&self) -> i64 {
        self.now.unwrap_or_else(unix_now)
    }
}

/// Options for proof generation.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Key identifier placed in the token header as `kid`.
    pub key_id: Option<String>,
    /// `iat` to set when the claims carry none. `None` uses the system clock.
    pub issued_at: Option<i64>,
}

impl GenerateOptions {
    /// Options carrying only a key identifier.
    pub fn with_key_id(key_id: Option<&str>) -> Self {
        Self {
            key_id: key_id.map(str::to_string),
            issued_at: None,
        }
    }
}

/// Current time in Unix seconds.
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
