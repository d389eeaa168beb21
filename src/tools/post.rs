use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{MutationRequest, VerifyEngine};

use super::{Tool, required};

/// Creates a text or link post, verification challenge included.
pub struct PostTool {
    engine: Arc<VerifyEngine>,
}

impl PostTool {
    pub fn new(engine: Arc<VerifyEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for PostTool {
    fn name(&self) -> &str {
        "post"
    }

    fn description(&self) -> &str {
        "Create a post on Moltbook. Args: {\"submolt\": \"<community>\", \"title\": \"<title>\", \
         and one of \"content\" (post body) or \"link\" (URL for a link post)}. \
         Solves the verification challenge automatically (up to 5 attempts)."
    }

    async fn execute(&self, args: &HashMap<String, String>) -> Result<String> {
        let submolt = required(args, "submolt")?;
        let title = required(args, "title")?;

        let body = match (args.get("content"), args.get("link")) {
            (Some(_), Some(_)) => bail!("'link' is mutually exclusive with 'content'"),
            (None, None) => bail!("one of 'content' or 'link' is required"),
            (Some(content), None) => {
                json!({"submolt_name": submolt, "title": title, "content": content})
            }
            (None, Some(link)) => json!({"submolt_name": submolt, "title": title, "url": link}),
        };

        let request = MutationRequest::with_body(Method::POST, "/posts", body);
        self.engine.run(&request).await.into_result()
    }
}
