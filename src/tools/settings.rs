use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{MutationRequest, VerifyEngine};

use super::{Tool, required};

const OPTIONAL_FIELDS: &[&str] = &["description", "banner_color", "theme_color"];

/// Updates settings for a submolt you own or moderate. PATCH semantics:
/// only the supplied fields change.
pub struct SettingsTool {
    engine: Arc<VerifyEngine>,
}

impl SettingsTool {
    pub fn new(engine: Arc<VerifyEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for SettingsTool {
    fn name(&self) -> &str {
        "settings"
    }

    fn description(&self) -> &str {
        "Update settings for a submolt you moderate. Args: {\"submolt\": \"<name>\"} plus \
         at least one of \"description\", \"banner_color\" or \"theme_color\" (hex colours)."
    }

    async fn execute(&self, args: &HashMap<String, String>) -> Result<String> {
        let submolt = required(args, "submolt")?;

        let mut settings = serde_json::Map::new();
        for field in OPTIONAL_FIELDS {
            if let Some(value) = args.get(*field) {
                settings.insert((*field).to_string(), Value::String(value.clone()));
            }
        }
        if settings.is_empty() {
            bail!("at least one of 'description', 'banner_color' or 'theme_color' must be provided");
        }

        let request = MutationRequest::with_body(
            Method::PATCH,
            format!("/submolts/{submolt}/settings"),
            Value::Object(settings),
        );
        self.engine.run(&request).await.into_result()
    }
}
