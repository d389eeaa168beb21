//! The mutation-verification loop.
//!
//! One [`VerifyEngine::run`] call drives a single mutation to a terminal
//! [`Outcome`]: submit, look for an embedded challenge, then cycle
//! solve → verify until the server confirms, the attempt budget runs out,
//! or something unrecoverable happens. Stale codes (expired, invalid,
//! consumed) discard the live challenge and re-issue the original mutation;
//! a wrong answer retries the same challenge unless configured otherwise.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

use crate::api::Api;
use crate::solver::Solver;
use crate::verification::{Challenge, find_challenge};

use super::{CodePolicy, EngineConfig, MutationRequest, Outcome};

/// Result of issuing the caller's mutation once.
enum Submitted {
    /// No challenge required; carries the published id.
    Done(String),
    Challenged(Challenge),
    Fatal(String),
}

/// Classification of one verify exchange.
#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Published { id: String },
    /// Code expired, invalid or consumed — re-issue the mutation.
    StaleCode,
    WrongAnswer { hint: String },
    Fatal(String),
}

pub struct VerifyEngine {
    api: Arc<Api>,
    solver: Arc<dyn Solver>,
    config: EngineConfig,
}

impl VerifyEngine {
    pub fn new(api: Arc<Api>, solver: Arc<dyn Solver>, config: EngineConfig) -> Self {
        Self {
            api,
            solver,
            config,
        }
    }

    /// Drive one mutation to a terminal outcome.
    ///
    /// The attempt counter only advances on solve attempts; resubmitting the
    /// mutation to fetch a fresh code is free. At most one challenge is live
    /// at a time — obtaining a new one supersedes the old.
    pub async fn run(&self, request: &MutationRequest) -> Outcome {
        let mut challenge: Option<Challenge> = None;
        let mut attempts = 0;
        let mut answer = String::new();
        let mut hint = String::new();

        while attempts < self.config.max_attempts {
            let live = match challenge.clone() {
                Some(live) => live,
                None => match self.submit(request).await {
                    Submitted::Done(id) => return Outcome::Published { id },
                    Submitted::Fatal(reason) => return Outcome::Fatal { reason },
                    Submitted::Challenged(fresh) => {
                        eprintln!("  [verify] challenge received (code: {})", fresh.code);
                        challenge = Some(fresh.clone());
                        fresh
                    }
                },
            };

            attempts += 1;
            answer = match self.solver.solve(&live.challenge_text).await {
                Ok(answer) => answer,
                Err(e) => {
                    return Outcome::Fatal {
                        reason: format!("solver failed: {e:#}"),
                    };
                }
            };
            eprintln!(
                "  [verify] attempt {}/{}: answering {:?}",
                attempts, self.config.max_attempts, answer
            );

            match self.verify(&live.code, &answer).await {
                Verdict::Published { id } => return Outcome::VerifiedPublished { id, answer },
                Verdict::Fatal(reason) => return Outcome::Fatal { reason },
                Verdict::StaleCode => challenge = None,
                Verdict::WrongAnswer { hint: fresh_hint } => {
                    hint = fresh_hint;
                    if self.config.resubmit_on_wrong_answer {
                        challenge = None;
                    }
                }
            }
        }

        Outcome::Exhausted {
            attempts,
            last_answer: answer,
            last_hint: hint,
        }
    }

    async fn submit(&self, request: &MutationRequest) -> Submitted {
        let resp = match self
            .api
            .request(
                request.method.clone(),
                &request.endpoint,
                request.body.as_ref(),
            )
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                return Submitted::Fatal(format!(
                    "HTTP error during {} {}: {}",
                    request.method, request.endpoint, e
                ));
            }
        };

        let status = resp.status();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                return Submitted::Fatal(format!(
                    "HTTP error during {} {}: {}",
                    request.method, request.endpoint, e
                ));
            }
        };

        let Ok(body) = serde_json::from_str::<Value>(&text) else {
            return Submitted::Fatal(format!(
                "non-JSON response from {} (status {}): {}",
                request.endpoint,
                status,
                snippet(&text)
            ));
        };

        if !success_flag(&body) {
            return Submitted::Fatal(format!("request failed (status {status}): {body}"));
        }

        match find_challenge(&body) {
            Some(challenge) => Submitted::Challenged(challenge),
            None => Submitted::Done(published_id(&body)),
        }
    }

    async fn verify(&self, code: &str, answer: &str) -> Verdict {
        let body = json!({ "verification_code": code, "answer": answer });
        let resp = match self.api.request(Method::POST, "/verify", Some(&body)).await {
            Ok(resp) => resp,
            Err(e) => return Verdict::Fatal(format!("HTTP error while verifying: {e}")),
        };

        let status = resp.status();
        // Expired code: the body carries nothing worth parsing.
        if status == StatusCode::GONE {
            return Verdict::StaleCode;
        }

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => return Verdict::Fatal(format!("HTTP error while verifying: {e}")),
        };
        let Ok(data) = serde_json::from_str::<Value>(&text) else {
            return Verdict::Fatal(format!(
                "non-JSON verification response (status {}): {}",
                status,
                snippet(&text)
            ));
        };

        classify(self.config.invalid_code_policy, status, &data)
    }
}

fn classify(policy: CodePolicy, status: StatusCode, data: &Value) -> Verdict {
    match status {
        StatusCode::NOT_FOUND | StatusCode::CONFLICT => match policy {
            CodePolicy::Resubmit => Verdict::StaleCode,
            CodePolicy::Fatal => {
                Verdict::Fatal(format!("verification code rejected (status {status}): {data}"))
            }
        },
        _ if success_flag(data) => Verdict::Published {
            id: verified_id(data),
        },
        // Wrong answer: {success: false, error: "Incorrect answer",
        // hint: "...", content_id: "..."}, possibly with a 4xx status.
        _ => Verdict::WrongAnswer {
            hint: data
                .get("hint")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
        },
    }
}

fn success_flag(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool).unwrap_or(false)
}

fn id_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `post.id` from a mutation response, or `"unknown"`.
fn published_id(body: &Value) -> String {
    body.pointer("/post/id")
        .and_then(id_field)
        .unwrap_or_else(|| "unknown".to_string())
}

/// `post.id` or `content_id` from a verify response, or `"unknown"`.
fn verified_id(body: &Value) -> String {
    body.pointer("/post/id")
        .and_then(id_field)
        .or_else(|| body.get("content_id").and_then(id_field))
        .unwrap_or_else(|| "unknown".to_string())
}

/// First 400 characters of a raw body, for error messages.
fn snippet(text: &str) -> &str {
    match text.char_indices().nth(400) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}
