use super::{ToolError, ToolRuntime};
use crate::types::{ChatMessage, ToolCall};
use serde_json::Value;
use tracing::{debug, info, warn};

impl ToolRuntime {
    /// Run one model-requested call and turn its result into a tool message.
    ///
    /// Mistakes the model can correct (unknown tool, malformed arguments)
    /// come back as error text in the tool message. A tool that reports
    /// `isError`, or a broken transport, fails the call.
    pub(crate) async fn execute(&self, call: &ToolCall) -> Result<ChatMessage, ToolError> {
        let Some(tool) = self.lookup(&call.name) else {
            warn!(requested_tool = %call.name, "Unknown tool requested by model");
            let message = format!(
                "Error: {} is not a valid tool, try one of [{}].",
                call.name,
                self.names().join(", ")
            );
            return Ok(ChatMessage::tool_result(&call.id, message));
        };

        let arguments = match parse_arguments(&call.arguments) {
            Ok(arguments) => arguments,
            Err(reason) => {
                warn!(tool = %tool.name, %reason, "Model sent malformed tool arguments");
                let message = format!(
                    "Error: invalid arguments for tool '{}': {reason}",
                    tool.name
                );
                return Ok(ChatMessage::tool_result(&call.id, message));
            }
        };

        debug!(tool = %tool.name, call_id = %call.id, "Dispatching tool via MCP");
        let outcome = self
            .bridge
            .call_tool(&tool.name, arguments)
            .await
            .map_err(|source| ToolError::Invoke {
                tool: tool.name.clone(),
                source,
            })?;

        info!(tool = %tool.name, success = !outcome.is_error, "Tool executed");
        if outcome.is_error {
            return Err(ToolError::Failed {
                tool: tool.name.clone(),
                message: outcome.text,
            });
        }
        Ok(ChatMessage::tool_result(&call.id, outcome.text))
    }
}

fn parse_arguments(raw: &str) -> Result<Value, String> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(Value::Null) => Ok(Value::Object(Default::default())),
        Ok(other) => Err(format!("expected a JSON object, got {other}")),
        Err(err) => Err(err.to_string()),
    }
}
