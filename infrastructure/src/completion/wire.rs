//! Chat completions wire format (OpenAI-compatible).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskpilot_domain::{CompletionResult, Message, ToolCall};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    pub role: &'a str,
    /// `null` for an assistant message that only carries tool calls
    pub content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireToolCall<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireFunction<'a> {
    pub name: &'a str,
    pub arguments: &'a str,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        let content = if message.is_tool_request() && message.content.is_empty() {
            None
        } else {
            Some(message.content.as_str())
        };

        Self {
            role: message.role.as_str(),
            content,
            tool_call_id: message.tool_call_id.as_deref(),
            name: message.name.as_deref(),
            tool_calls: message
                .tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: &call.id,
                    kind: "function",
                    function: WireFunction {
                        name: &call.name,
                        arguments: &call.arguments,
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Some gateways report upstream failures with a 200 and an error object
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseToolCall {
    #[serde(default)]
    pub id: String,
    pub function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<Value>,
}

impl ApiError {
    /// Numeric status carried in `code`, if any
    pub fn status(&self) -> Option<u16> {
        match &self.code {
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        }
    }
}

/// Arguments as the raw JSON text the dispatcher expects.
///
/// Most services send a JSON-encoded string; a few send the object itself,
/// which is re-encoded unchanged.
fn raw_arguments(arguments: Value) -> String {
    match arguments {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl ResponseMessage {
    pub fn into_result(self) -> CompletionResult {
        let calls = self
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                ToolCall::new(
                    call.id,
                    call.function.name,
                    raw_arguments(call.function.arguments),
                )
            })
            .collect();
        CompletionResult::from_parts(self.content, calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_request_message_has_null_content() {
        let message = Message::assistant_tool_calls(vec![ToolCall::new(
            "call_1",
            "add_task",
            r#"{"title":"Buy milk"}"#,
        )]);
        let wire = serde_json::to_value(WireMessage::from(&message)).unwrap();

        assert_eq!(wire["role"], "assistant");
        assert!(wire["content"].is_null());
        assert_eq!(wire["tool_calls"][0]["type"], "function");
        assert_eq!(wire["tool_calls"][0]["function"]["name"], "add_task");
        assert_eq!(
            wire["tool_calls"][0]["function"]["arguments"],
            r#"{"title":"Buy milk"}"#
        );
    }

    #[test]
    fn test_tool_message_carries_call_id() {
        let message = Message::tool("call_1", "add_task", r#"{"id":7}"#);
        let wire = serde_json::to_value(WireMessage::from(&message)).unwrap();

        assert_eq!(wire["role"], "tool");
        assert_eq!(wire["tool_call_id"], "call_1");
        assert_eq!(wire["name"], "add_task");
        assert_eq!(wire["content"], r#"{"id":7}"#);
        assert!(wire.get("tool_calls").is_none());
    }

    #[test]
    fn test_object_arguments_are_reencoded() {
        let message: ResponseMessage = serde_json::from_value(json!({
            "content": null,
            "tool_calls": [
                {"id": "a", "function": {"name": "list_tasks", "arguments": {"status": "all"}}},
                {"id": "b", "function": {"name": "list_tasks", "arguments": "{\"status\":\"complete\"}"}}
            ]
        }))
        .unwrap();

        let CompletionResult::ToolRequest { calls, .. } = message.into_result() else {
            panic!("expected tool request");
        };
        assert_eq!(calls[0].arguments, r#"{"status":"all"}"#);
        assert_eq!(calls[1].arguments, r#"{"status":"complete"}"#);
    }

    #[test]
    fn test_text_with_tool_calls_is_kept_on_request() {
        let message: ResponseMessage = serde_json::from_value(json!({
            "content": "Let me check.",
            "tool_calls": [{"id": "a", "function": {"name": "list_tasks", "arguments": "{}"}}]
        }))
        .unwrap();
        let CompletionResult::ToolRequest { calls, text } = message.into_result() else {
            panic!("expected tool request");
        };
        assert_eq!(calls.len(), 1);
        assert_eq!(text, "Let me check.");
    }

    #[test]
    fn test_tool_request_message_keeps_text() {
        let message = Message {
            content: "Let me check.".to_string(),
            ..Message::assistant_tool_calls(vec![ToolCall::new("a", "list_tasks", "{}")])
        };
        let wire = serde_json::to_value(WireMessage::from(&message)).unwrap();

        assert_eq!(wire["content"], "Let me check.");
        assert_eq!(wire["tool_calls"][0]["id"], "a");
    }

    #[test]
    fn test_api_error_status() {
        let err: ApiError = serde_json::from_value(json!({"message": "x", "code": 502})).unwrap();
        assert_eq!(err.status(), Some(502));
        let err: ApiError = serde_json::from_value(json!({"message": "x", "code": "429"})).unwrap();
        assert_eq!(err.status(), Some(429));
        let err: ApiError = serde_json::from_value(json!({"message": "x"})).unwrap();
        assert_eq!(err.status(), None);
    }
}
