use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{MutationRequest, VerifyEngine};

use super::Tool;

/// Marks notifications as read, for one post or all of them.
pub struct NotificationsTool {
    engine: Arc<VerifyEngine>,
}

impl NotificationsTool {
    pub fn new(engine: Arc<VerifyEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for NotificationsTool {
    fn name(&self) -> &str {
        "notifications"
    }

    fn description(&self) -> &str {
        "Mark notifications as read. Args: {\"post_id\": \"<id>\"} to clear one post's \
         notifications, or no args to clear all of them."
    }

    async fn execute(&self, args: &HashMap<String, String>) -> Result<String> {
        let endpoint = match args.get("post_id") {
            Some(post_id) => format!("/notifications/read-by-post/{post_id}"),
            None => "/notifications/read-all".to_string(),
        };

        let request = MutationRequest::new(Method::POST, endpoint);
        self.engine.run(&request).await.into_result()
    }
}
