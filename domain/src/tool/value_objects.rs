//! Tool domain value objects: immutable result and error types
//!
//! These types form the **output side** of a tool invocation. Every
//! dispatched call produces exactly one [`ToolResult`], successful or not;
//! failures are carried as data so they can be shown to the model.

use serde::{Deserialize, Serialize};

/// Error that occurred while dispatching a tool call.
///
/// | Code | Raised when |
/// |------|-------------|
/// | `NOT_FOUND` | Tool name is not in the registry |
/// | `INVALID_ARGUMENT` | Payload unparseable or fails validation |
/// | `EXECUTION_FAILED` | Endpoint unreachable or non-success status after retries |
/// | `TIMEOUT` | Every attempt exceeded the per-call timeout |
/// | `REMOTE_ERROR` | Endpoint ran the tool and reported an error |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "INVALID_ARGUMENT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Unknown tool: {}", name.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::new("REMOTE_ERROR", message)
    }

    /// Argument problems are the model's to fix; the rest are environmental.
    pub fn is_argument_error(&self) -> bool {
        self.code == "INVALID_ARGUMENT" || self.code == "NOT_FOUND"
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of dispatching one tool call.
///
/// Created by the dispatcher and consumed once by the agent loop, which turns
/// it into a tool-role message. `content` is what the model sees: the
/// endpoint's payload on success, a JSON error object on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the call this result answers
    pub tool_call_id: String,
    /// Name of the tool, as requested by the model
    pub tool_name: String,
    /// Content fed back to the model
    pub content: String,
    /// Whether the call failed
    pub is_error: bool,
    /// Error information (for failed calls)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about a dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Wall-clock duration including retries, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of endpoint attempts made (0 when rejected before any network call)
    #[serde(default)]
    pub attempts: u32,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            content: content.into(),
            is_error: false,
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result; the content is a JSON error object.
    pub fn failure(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        error: ToolError,
    ) -> Self {
        let content = serde_json::json!({ "error": &error }).to_string();
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            content,
            is_error: true,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.metadata.attempts = attempts;
        self
    }

    pub fn is_success(&self) -> bool {
        !self.is_error
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::invalid_argument("bad json").with_details("line 1, column 9");
        assert_eq!(err.to_string(), "[INVALID_ARGUMENT] bad json (line 1, column 9)");
        assert!(err.is_argument_error());
        assert!(ToolError::unknown_tool("get_weather").is_argument_error());
        assert!(!ToolError::timeout("add_task").is_argument_error());
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("call_1", "add_task", r#"{"id":3}"#).with_attempts(1);

        assert!(result.is_success());
        assert_eq!(result.content, r#"{"id":3}"#);
        assert!(result.error().is_none());
        assert_eq!(result.metadata.attempts, 1);
    }

    #[test]
    fn test_tool_result_failure_content_is_structured() {
        let result = ToolResult::failure("call_2", "get_weather", ToolError::unknown_tool("get_weather"));

        assert!(result.is_error);
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");

        let parsed: serde_json::Value = serde_json::from_str(&result.content).unwrap();
        assert_eq!(parsed["error"]["code"], "NOT_FOUND");
        assert_eq!(parsed["error"]["message"], "Unknown tool: get_weather");
        assert!(parsed["error"].get("details").is_none());
    }
}
