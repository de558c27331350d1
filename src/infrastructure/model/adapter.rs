//! Message adapters - convert between domain messages and the chat
//! completions wire format

use crate::types::{ChatMessage, MessageRole, ToolCall, ToolSpec};
use serde_json::{Value, json};

/// Adapter for converting messages to the OpenAI chat-completions format
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages.iter().map(Self::message_to_openai).collect()
    }

    fn message_to_openai(msg: &ChatMessage) -> Value {
        match msg.role {
            MessageRole::Assistant if msg.has_tool_calls() => {
                let calls: Vec<Value> = msg
                    .tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments,
                            }
                        })
                    })
                    .collect();
                let content = if msg.content.is_empty() {
                    Value::Null
                } else {
                    Value::String(msg.content.clone())
                };
                json!({
                    "role": "assistant",
                    "content": content,
                    "tool_calls": calls,
                })
            }
            MessageRole::Tool => json!({
                "role": "tool",
                "tool_call_id": msg.tool_call_id.clone().unwrap_or_default(),
                "content": msg.content,
            }),
            role => json!({
                "role": role.as_str(),
                "content": msg.content,
            }),
        }
    }

    /// Convert tool specs to the `tools` array of a chat-completions request
    pub fn tools_to_openai_format(tools: &[ToolSpec]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                let mut function = json!({
                    "name": tool.name,
                    "parameters": tool.parameters,
                });
                if let Some(description) = &tool.description {
                    function["description"] = Value::String(description.clone());
                }
                json!({ "type": "function", "function": function })
            })
            .collect()
    }

    /// Build the assistant message from a `choices[].message` object.
    pub fn message_from_openai(message: &Value) -> ChatMessage {
        let content = message
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let tool_calls: Vec<ToolCall> = message
            .get("tool_calls")
            .and_then(Value::as_array)
            .map(|calls| calls.iter().filter_map(Self::tool_call_from_openai).collect())
            .unwrap_or_default();

        ChatMessage::assistant_with_calls(content, tool_calls)
    }

    fn tool_call_from_openai(call: &Value) -> Option<ToolCall> {
        let function = call.get("function")?;
        let name = function.get("name").and_then(Value::as_str)?.to_string();
        let arguments = match function.get("arguments") {
            Some(Value::String(raw)) => raw.clone(),
            Some(Value::Null) | None => "{}".to_string(),
            Some(other) => other.to_string(),
        };
        let id = call
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple()));
        Some(ToolCall {
            id,
            name,
            arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_tool_calls_serialize_with_null_content() {
        let message = ChatMessage::assistant_with_calls(
            "",
            vec![ToolCall {
                id: "call_1".into(),
                name: "list_databases".into(),
                arguments: "{}".into(),
            }],
        );
        let wire = MessageAdapter::to_openai_format(&[message]);
        assert_eq!(wire[0]["content"], Value::Null);
        assert_eq!(wire[0]["tool_calls"][0]["type"], "function");
        assert_eq!(wire[0]["tool_calls"][0]["function"]["name"], "list_databases");
        assert_eq!(wire[0]["tool_calls"][0]["function"]["arguments"], "{}");
    }

    #[test]
    fn tool_message_carries_call_id() {
        let wire = MessageAdapter::to_openai_format(&[ChatMessage::tool_result("call_9", "[]")]);
        assert_eq!(
            wire[0],
            json!({"role": "tool", "tool_call_id": "call_9", "content": "[]"})
        );
    }

    #[test]
    fn parses_response_with_null_content_and_tool_calls() {
        let message = json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_abc",
                "type": "function",
                "function": {"name": "get_schema", "arguments": "{\"collection\":\"jobs\"}"}
            }]
        });
        let parsed = MessageAdapter::message_from_openai(&message);
        assert_eq!(parsed.content, "");
        assert_eq!(parsed.tool_calls.len(), 1);
        assert_eq!(parsed.tool_calls[0].id, "call_abc");
        assert_eq!(parsed.tool_calls[0].arguments, "{\"collection\":\"jobs\"}");
    }

    #[test]
    fn tool_spec_without_description_omits_field() {
        let tools = MessageAdapter::tools_to_openai_format(&[ToolSpec {
            name: "ping".into(),
            description: None,
            parameters: json!({"type": "object"}),
        }]);
        assert!(tools[0]["function"].get("description").is_none());
        assert_eq!(tools[0]["function"]["parameters"]["type"], "object");
    }
}
