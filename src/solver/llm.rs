use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::consts::SOLVER_TIMEOUT;

use super::Solver;

/// Model used for challenge solving, regardless of what the rest of the
/// system is configured with. The challenges are obfuscated grade-school
/// arithmetic: a small instruct model answers them in well under a second,
/// and a reasoning model would burn its token budget before emitting the
/// number.
const SOLVER_MODEL: &str = "meta-llama/llama-3.2-3b-instruct";

/// Output ceiling. The answer is a single number, anything longer is waste.
const SOLVER_MAX_TOKENS: u32 = 32;

/// Solves challenges by calling an OpenAI-compatible chat completions API.
pub struct LlmSolver {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

impl LlmSolver {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SOLVER_TIMEOUT)
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client,
        })
    }

    fn build_prompt(challenge_text: &str) -> String {
        format!(
            "Decode and solve the following math problem. \
             The text has random capitalisation and punctuation noise \
             (characters like ], [, ^, /, - scattered through the words). \
             Strip all that noise, read the plain English sentence, solve it, \
             and reply with ONLY the numeric answer formatted to exactly 2 decimal \
             places (e.g. '15.00'). No explanation, no other text.\n\n\
             Problem: {}",
            challenge_text.to_lowercase()
        )
    }

    fn normalize_answer(raw: &str) -> Result<String> {
        let answer = raw.trim();
        if answer.is_empty() {
            bail!("empty answer from solver for math challenge");
        }
        Ok(answer.to_string())
    }
}

#[async_trait]
impl Solver for LlmSolver {
    async fn solve(&self, challenge_text: &str) -> Result<String> {
        let body = ApiRequest {
            model: SOLVER_MODEL,
            max_tokens: SOLVER_MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: Self::build_prompt(challenge_text),
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("authorization", format!("Bearer {}", self.token))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("solver API error ({}): {}", status, text);
        }

        let api_resp: ApiResponse = resp.json().await?;
        let content = api_resp
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or("");

        Self::normalize_answer(content)
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
