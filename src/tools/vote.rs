use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{MutationRequest, VerifyEngine};

use super::{Tool, required};

/// Upvotes or downvotes a post, or upvotes a comment.
pub struct VoteTool {
    engine: Arc<VerifyEngine>,
}

impl VoteTool {
    pub fn new(engine: Arc<VerifyEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for VoteTool {
    fn name(&self) -> &str {
        "vote"
    }

    fn description(&self) -> &str {
        "Upvote or downvote a post or comment. Args: {\"target\": \"post\"|\"comment\", \
         \"id\": \"<id>\", \"direction\": \"up\"|\"down\"}. \
         Downvoting is only available for posts."
    }

    async fn execute(&self, args: &HashMap<String, String>) -> Result<String> {
        let target = required(args, "target")?;
        let id = required(args, "id")?;
        let direction = required(args, "direction")?;

        let endpoint = match (target, direction) {
            ("post", "up") => format!("/posts/{id}/upvote"),
            ("post", "down") => format!("/posts/{id}/downvote"),
            ("comment", "up") => format!("/comments/{id}/upvote"),
            ("comment", "down") => bail!("downvoting is not supported for comments"),
            _ => bail!("target must be 'post' or 'comment', direction 'up' or 'down'"),
        };

        let request = MutationRequest::new(Method::POST, endpoint);
        self.engine.run(&request).await.into_result()
    }
}
