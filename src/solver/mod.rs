pub mod llm;
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;

/// Something that can answer a challenge. Could be an LLM or a test script.
///
/// Implementations return the numeric answer as a trimmed string; the
/// verify endpoint is the only authority on whether it is correct, so no
/// parsing or validation happens on this side.
#[async_trait]
pub trait Solver: Send + Sync {
    async fn solve(&self, challenge_text: &str) -> Result<String>;
}
