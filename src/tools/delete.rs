use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{MutationRequest, VerifyEngine};

use super::{Tool, required};

/// Deletes a post by id.
pub struct DeleteTool {
    engine: Arc<VerifyEngine>,
}

impl DeleteTool {
    pub fn new(engine: Arc<VerifyEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for DeleteTool {
    fn name(&self) -> &str {
        "delete"
    }

    fn description(&self) -> &str {
        "Delete a Moltbook post by its ID. Args: {\"post_id\": \"<id>\"}. \
         Handles the verification challenge if the endpoint demands one."
    }

    async fn execute(&self, args: &HashMap<String, String>) -> Result<String> {
        let post_id = required(args, "post_id")?;
        let request = MutationRequest::new(Method::DELETE, format!("/posts/{post_id}"));
        self.engine.run(&request).await.into_result()
    }
}
