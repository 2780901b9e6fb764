//! Ollama `/api/chat` and `/api/tags` wire format

use crate::types::messages::{Role, ToolCallRequest, Turn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat request body
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage>,
    pub stream: bool,
    pub tools: &'a [Value],
}

impl<'a> ChatRequest<'a> {
    /// Non-streaming request over the given turns and tool descriptors
    pub fn new(model: &'a str, turns: &[Turn], tools: &'a [Value]) -> Self {
        Self {
            model,
            messages: turns.iter().map(WireMessage::from).collect(),
            stream: false,
            tools,
        }
    }
}

/// A message as sent to or received from the endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,

    /// Tool name on tool turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&Turn> for WireMessage {
    fn from(turn: &Turn) -> Self {
        let tool_calls = if turn.tool_calls.is_empty() {
            None
        } else {
            Some(turn.tool_calls.iter().map(WireToolCall::from).collect())
        };
        Self {
            role: turn.role,
            content: turn.content.clone(),
            tool_calls,
            name: turn.tool_name.clone(),
        }
    }
}

impl WireMessage {
    /// Convert a response message into an assistant turn
    pub fn into_turn(self) -> Turn {
        let calls = self
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(WireToolCall::into_request)
            .collect();
        Turn::assistant(self.content, calls)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireToolCall {
    pub function: WireFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl From<&ToolCallRequest> for WireToolCall {
    fn from(call: &ToolCallRequest) -> Self {
        Self {
            function: WireFunction {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

impl WireToolCall {
    /// Arguments may arrive as an object or as a string encoding one
    pub fn into_request(self) -> ToolCallRequest {
        let arguments = match self.function.arguments {
            Value::String(text) => match serde_json::from_str::<Value>(&text) {
                Ok(parsed @ Value::Object(_)) => parsed,
                _ => Value::String(text),
            },
            other => other,
        };
        ToolCallRequest::new(self.function.name, arguments)
    }
}

/// Chat response body
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: WireMessage,
}

/// `/api/tags` response body
#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub name: String,
}
