pub mod verify;

use std::fmt;

use reqwest::Method;
use serde_json::Value;

pub use verify::VerifyEngine;

/// Maximum solve-then-verify cycles per run.
pub const MAX_VERIFY_ATTEMPTS: usize = 5;

/// A state-changing request, as the caller wants it issued.
/// Read-only to the engine; resubmission re-issues it as-is.
#[derive(Debug, Clone)]
pub struct MutationRequest {
    pub method: Method,
    pub endpoint: String,
    pub body: Option<Value>,
}

impl MutationRequest {
    /// A bodyless mutation (e.g. DELETE, or the vote endpoints).
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
        }
    }

    pub fn with_body(method: Method, endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: Some(body),
        }
    }
}

/// What to do when `/verify` reports the code invalid (404) or already
/// consumed (409). An expired code (410) always triggers resubmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodePolicy {
    /// Discard the code and re-issue the mutation for a fresh one.
    #[default]
    Resubmit,
    /// Terminate the run instead of resubmitting.
    Fatal,
}

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub max_attempts: usize,
    pub invalid_code_policy: CodePolicy,
    /// Re-issue the mutation after a wrong answer instead of retrying the
    /// same challenge. Off by default: an unexpired challenge stays usable.
    pub resubmit_on_wrong_answer: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_VERIFY_ATTEMPTS,
            invalid_code_policy: CodePolicy::default(),
            resubmit_on_wrong_answer: false,
        }
    }
}

/// Terminal result of one engine run.
///
/// Expected remote-side conditions (wrong answer, stale code) never surface
/// as errors mid-run; every run ends in exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation went through without a challenge.
    Published { id: String },
    /// A challenge was solved and the mutation confirmed.
    VerifiedPublished { id: String, answer: String },
    /// The attempt budget ran out before a correct answer.
    Exhausted {
        attempts: usize,
        last_answer: String,
        last_hint: String,
    },
    /// Transport failure, unparseable body, or an explicit rejection.
    Fatal { reason: String },
}

impl Outcome {
    /// Fold into a caller-facing result: success variants become messages,
    /// failure variants become errors carrying the same message.
    pub fn into_result(self) -> anyhow::Result<String> {
        match self {
            Outcome::Exhausted { .. } | Outcome::Fatal { .. } => anyhow::bail!("{self}"),
            ok => Ok(ok.to_string()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Published { id } => write!(f, "request succeeded (id: {id})."),
            Outcome::VerifiedPublished { id, answer } => write!(
                f,
                "verified and published successfully (id: {id}, answer used: {answer:?})."
            ),
            Outcome::Exhausted {
                attempts,
                last_answer,
                last_hint,
            } => write!(
                f,
                "exhausted {attempts} verification attempts without success. \
                 Last answer tried: {last_answer:?}. Hint from server: {last_hint:?}. \
                 Could not complete the request."
            ),
            Outcome::Fatal { reason } => write!(f, "{reason}"),
        }
    }
}
