//! Message adapters - convert between internal turns and the chat-completions wire format

use crate::types::{ChatMessage, MessageRole, ToolCall, ToolDefinition};
use serde_json::{Map, Value, json};

pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format, including tool-call turns
    /// and tool results keyed by `tool_call_id`.
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages.iter().map(Self::message_to_openai).collect()
    }

    fn message_to_openai(message: &ChatMessage) -> Value {
        let mut entry = Map::new();
        entry.insert("role".into(), json!(message.role.as_str()));
        entry.insert(
            "content".into(),
            message.content.clone().map(Value::String).unwrap_or(Value::Null),
        );

        if message.role == MessageRole::Assistant && !message.tool_calls.is_empty() {
            let calls = message
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
            entry.insert("tool_calls".into(), Value::Array(calls));
        }

        if let Some(call_id) = &message.tool_call_id {
            entry.insert("tool_call_id".into(), json!(call_id));
        }

        Value::Object(entry)
    }

    /// Convert tool definitions to the `tools` array of a chat-completions request.
    pub fn tools_to_openai(tools: &[ToolDefinition]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect()
    }

    pub fn tool_call_from_openai(id: String, name: String, arguments: String) -> ToolCall {
        ToolCall { id, name, arguments }
    }
}
