pub mod delete;
pub mod fetch;
pub mod notifications;
pub mod post;
pub mod settings;
pub mod subscribe;
pub mod vote;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of a single tool execution. Errors are information, not panics.
#[derive(Debug, Clone)]
pub enum ToolOutcome {
    Success(String),
    Error(String),
}

/// Result of executing a tool by name.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub tool: String,
    pub outcome: ToolOutcome,
}

/// Describes a tool for the `tools` listing.
#[derive(Debug, Clone)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
}

/// One Moltbook operation the CLI can perform.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    async fn execute(&self, args: &HashMap<String, String>) -> Result<String>;
}

/// Holds all registered tools. Registration happens once at startup.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub async fn execute(&self, tool_name: &str, args: &HashMap<String, String>) -> ToolResult {
        match self.tools.get(tool_name) {
            Some(tool) => match tool.execute(args).await {
                Ok(output) => ToolResult {
                    tool: tool_name.to_string(),
                    outcome: ToolOutcome::Success(output),
                },
                Err(e) => ToolResult {
                    tool: tool_name.to_string(),
                    outcome: ToolOutcome::Error(format!("{e:#}")),
                },
            },
            None => ToolResult {
                tool: tool_name.to_string(),
                outcome: ToolOutcome::Error(format!("unknown tool: {tool_name}")),
            },
        }
    }

    /// Name + description of every registered tool, sorted by name.
    pub fn descriptions(&self) -> Vec<ToolDescription> {
        let mut list: Vec<ToolDescription> = self
            .tools
            .values()
            .map(|t| ToolDescription {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }
}

/// Fetch a required argument by key.
pub(crate) fn required<'a>(args: &'a HashMap<String, String>, key: &str) -> Result<&'a str> {
    args.get(key)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing required arg: {key}"))
}
