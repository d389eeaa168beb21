use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{MutationRequest, VerifyEngine};

use super::{Tool, required};

/// Subscribes to or unsubscribes from a submolt.
pub struct SubscribeTool {
    engine: Arc<VerifyEngine>,
}

impl SubscribeTool {
    pub fn new(engine: Arc<VerifyEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for SubscribeTool {
    fn name(&self) -> &str {
        "subscribe"
    }

    fn description(&self) -> &str {
        "Subscribe to or unsubscribe from a submolt. Args: {\"submolt\": \"<name>\", \
         \"action\": \"subscribe\"|\"unsubscribe\" (default \"subscribe\")}."
    }

    async fn execute(&self, args: &HashMap<String, String>) -> Result<String> {
        let submolt = required(args, "submolt")?;
        let action = args.get("action").map(String::as_str).unwrap_or("subscribe");

        let method = match action {
            "subscribe" => Method::POST,
            "unsubscribe" => Method::DELETE,
            _ => bail!("action must be 'subscribe' or 'unsubscribe'"),
        };

        let request = MutationRequest::new(method, format!("/submolts/{submolt}/subscribe"));
        self.engine.run(&request).await.into_result()
    }
}
