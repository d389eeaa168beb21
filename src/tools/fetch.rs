use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::Api;

use super::{Tool, required};

/// Authenticated read-only GET of an arbitrary API path.
/// No verification loop — reads are never challenged.
pub struct FetchTool {
    api: Arc<Api>,
}

impl FetchTool {
    pub fn new(api: Arc<Api>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for FetchTool {
    fn name(&self) -> &str {
        "fetch"
    }

    fn description(&self) -> &str {
        "Make an authenticated GET request to the Moltbook API. \
         Args: {\"path\": \"<path relative to the API base, e.g. /posts or posts/123>\"}."
    }

    async fn execute(&self, args: &HashMap<String, String>) -> Result<String> {
        let path = required(args, "path")?;

        let resp = self
            .api
            .get(path)
            .await
            .with_context(|| format!("HTTP error during GET {path}"))?;
        let status = resp.status();
        let text = resp.text().await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => Ok(format!(
                "GET {path} (status {status}):\n{}",
                serde_json::to_string_pretty(&body)?
            )),
            Err(_) => Ok(format!("GET {path} (status {status}):\n{text}")),
        }
    }
}
