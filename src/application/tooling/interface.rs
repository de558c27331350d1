use async_trait::async_trait;
use serde_json::{Value, json};

use super::error::ToolInvokeError;
use crate::types::ToolSpec;

/// A tool advertised by the server through `tools/list`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerToolInfo {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

impl ServerToolInfo {
    pub(super) fn from_listing(tool: &Value) -> Option<Self> {
        let name = tool.get("name").and_then(Value::as_str)?.to_string();
        let description = tool
            .get("description")
            .and_then(Value::as_str)
            .map(|text| text.to_string());
        let input_schema = tool
            .get("inputSchema")
            .cloned()
            .filter(Value::is_object)
            .unwrap_or_else(|| json!({ "type": "object", "properties": {} }));
        Some(Self {
            name,
            description,
            input_schema,
        })
    }

    pub fn to_spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.input_schema.clone(),
        }
    }
}

/// Result of a `tools/call` request, flattened to the text the model sees.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ToolCallOutcome {
    pub fn from_result(raw: &Value) -> Self {
        let is_error = raw.get("isError").and_then(Value::as_bool).unwrap_or(false);

        let parts: Vec<&str> = raw
            .get("content")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(content_text).collect())
            .unwrap_or_default();

        let text = if !parts.is_empty() {
            parts.join("\n")
        } else {
            match raw.get("structuredContent") {
                Some(Value::Null) | None => String::new(),
                Some(structured) => structured.to_string(),
            }
        };

        Self { text, is_error }
    }
}

fn content_text(item: &Value) -> Option<&str> {
    match item.get("type").and_then(Value::as_str)? {
        "text" => item.get("text").and_then(Value::as_str),
        "resource" => item
            .get("resource")
            .and_then(|resource| resource.get("text"))
            .and_then(Value::as_str),
        _ => None,
    }
}

/// Seam between the agent and the MCP session that executes its tools.
#[async_trait]
pub trait ToolServerInterface: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ServerToolInfo>, ToolInvokeError>;

    async fn call_tool(
        &self,
        tool: &str,
        arguments: Value,
    ) -> Result<ToolCallOutcome, ToolInvokeError>;
}
