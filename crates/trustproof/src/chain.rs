//! Chain verification.
//!
//! A chain is intact when every token verifies on its own, every entry hash
//! matches its recomputation, the first `prev_hash` is the genesis value, and
//! each later `prev_hash` equals the previous entry hash. The scan stops at
//! the first failure and reports its index.
//!
//! Signature checks are independent per token and may run as a concurrent
//! pre-pass ([`VerifyConfig::parallel_signatures`]). The linkage pass is
//! always sequential, so the reported index is the lowest failing one either
//! way.

use serde_json::{json, Map, Value};
use std::fmt;
use std::num::NonZeroUsize;

use trustproof_core::{ErrorCode, Hex64, ProofError};

use crate::config::VerifyConfig;
use crate::crypto::Ed25519PublicKey;
use crate::verify::{verify_with_config, VerifyOutcome};

/// The result of verifying a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    /// Every link checks out.
    Intact {
        /// Number of tokens verified.
        length: usize,
        /// Entry hash of the last token; `None` for an empty chain.
        head: Option<Hex64>,
    },
    /// The first failure found.
    Broken(ChainBreak),
}

impl ChainOutcome {
    /// Check if the chain verified.
    pub fn is_intact(&self) -> bool {
        matches!(self, ChainOutcome::Intact { .. })
    }

    /// The failure, if broken.
    pub fn break_info(&self) -> Option<&ChainBreak> {
        match self {
            ChainOutcome::Intact { .. } => None,
            ChainOutcome::Broken(brk) => Some(brk),
        }
    }

    /// Render as `{ok, errors}` for host tooling.
    pub fn to_report(&self) -> Value {
        match self {
            ChainOutcome::Intact { .. } => json!({"ok": true, "errors": []}),
            ChainOutcome::Broken(brk) => json!({"ok": false, "errors": [brk.to_report()]}),
        }
    }
}

/// Where and why a chain broke.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainBreak {
    /// Zero-based position of the offending token. `None` only when the
    /// configured genesis hash itself is malformed.
    pub index: Option<usize>,
    pub code: ErrorCode,
    pub message: String,
    /// The token's own verification errors, for `INVALID_PROOF`.
    pub causes: Vec<ProofError>,
}

impl ChainBreak {
    fn at(index: usize, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            code,
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Render as `{code, message, index?, details?}`.
    pub fn to_report(&self) -> Value {
        let mut report = Map::new();
        report.insert("code".to_string(), json!(self.code));
        report.insert("message".to_string(), Value::String(self.message.clone()));
        if let Some(index) = self.index {
            report.insert("index".to_string(), json!(index));
        }
        if !self.causes.is_empty() {
            report.insert("details".to_string(), json!(self.causes));
        }
        Value::Object(report)
    }
}

impl fmt::Display for ChainBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{} at index {}: {}", self.code, index, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for ChainBreak {}

/// Verify an ordered sequence of tokens as a hash chain.
pub fn verify_chain<S>(tokens: &[S], key: &Ed25519PublicKey) -> ChainOutcome
where
    S: AsRef<str> + Sync,
{
    verify_chain_with_config(tokens, key, &VerifyConfig::default())
}

/// [`verify_chain`] with explicit configuration.
pub fn verify_chain_with_config<S>(
    tokens: &[S],
    key: &Ed25519PublicKey,
    config: &VerifyConfig,
) -> ChainOutcome
where
    S: AsRef<str> + Sync,
{
    let outcome = scan(tokens, key, config);
    match &outcome {
        ChainOutcome::Intact { length, .. } => {
            tracing::debug!(length, "chain verified");
        }
        ChainOutcome::Broken(brk) => {
            tracing::warn!(index = ?brk.index, code = %brk.code, "chain verification failed");
        }
    }
    outcome
}

fn scan<S>(tokens: &[S], key: &Ed25519PublicKey, config: &VerifyConfig) -> ChainOutcome
where
    S: AsRef<str> + Sync,
{
    let genesis = match &config.expected_genesis_prev_hash {
        None => Hex64::ZERO,
        Some(hash) => match Hex64::parse(hash) {
            Ok(hash) => hash,
            Err(_) => {
                return ChainOutcome::Broken(ChainBreak {
                    index: None,
                    code: ErrorCode::ChainGenesisPrevHashInvalid,
                    message: "Expected genesis prev_hash must be a 64-char hex string."
                        .to_string(),
                    causes: Vec::new(),
                });
            }
        },
    };

    let mut prepass = if config.parallel_signatures && tokens.len() > 1 {
        Some(verify_all_parallel(tokens, key, config).into_iter())
    } else {
        None
    };

    let mut previous: Option<Hex64> = None;
    for (index, token) in tokens.iter().enumerate() {
        let outcome = match prepass.as_mut().and_then(Iterator::next) {
            Some(outcome) => outcome,
            None => verify_with_config(token.as_ref(), key, None, None, config),
        };

        let claims = match outcome {
            VerifyOutcome::Valid(claims) => claims,
            VerifyOutcome::Invalid(rejection) => {
                let summary: Vec<String> =
                    rejection.errors().iter().map(ToString::to_string).collect();
                return ChainOutcome::Broken(ChainBreak {
                    index: Some(index),
                    code: ErrorCode::InvalidProof,
                    message: format!(
                        "Proof signature/schema verification failed: {}",
                        summary.join("; ")
                    ),
                    causes: rejection.errors().to_vec(),
                });
            }
        };

        let link = *claims.chain();
        if claims.recompute_entry_hash() != link.entry_hash {
            return ChainOutcome::Broken(ChainBreak::at(
                index,
                ErrorCode::ChainEntryHashMismatch,
                "chain.entry_hash does not match recomputed entry hash.",
            ));
        }

        match previous {
            None if link.prev_hash != genesis => {
                let message = if genesis.is_zero() {
                    "Genesis proof chain.prev_hash must be 64 zeros."
                } else {
                    "Genesis proof chain.prev_hash does not match the expected genesis prev_hash."
                };
                return ChainOutcome::Broken(ChainBreak::at(
                    index,
                    ErrorCode::ChainGenesisPrevHashInvalid,
                    message,
                ));
            }
            Some(expected) if link.prev_hash != expected => {
                return ChainOutcome::Broken(ChainBreak::at(
                    index,
                    ErrorCode::ChainLinkMismatch,
                    "chain.prev_hash does not match previous proof chain.entry_hash.",
                ));
            }
            _ => {}
        }

        previous = Some(link.entry_hash);
    }

    ChainOutcome::Intact {
        length: tokens.len(),
        head: previous,
    }
}

/// Verify every token on scoped worker threads, preserving order.
fn verify_all_parallel<S>(
    tokens: &[S],
    key: &Ed25519PublicKey,
    config: &VerifyConfig,
) -> Vec<VerifyOutcome>
where
    S: AsRef<str> + Sync,
{
    let workers = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    let chunk_size = tokens.len().div_ceil(workers).max(1);

    std::thread::scope(|scope| {
        let handles: Vec<_> = tokens
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|token| verify_with_config(token.as_ref(), key, None, None, config))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(outcomes) => outcomes,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
