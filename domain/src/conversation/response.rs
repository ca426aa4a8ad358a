//! Completion response shape.
//!
//! One call to the completion service yields exactly one of two shapes:
//!
//! ```text
//! Final(text)            → the loop ends, text goes to the caller
//! ToolRequest{calls}     → calls are dispatched, results appended, loop repeats
//! ```
//!
//! Text sent alongside tool calls stays on the tool request so the model
//! sees its own explanation on the next round.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CompletionResult {
    /// Free-text answer; may be empty.
    Final(String),
    /// Ordered, non-empty list of requested invocations, plus any text the
    /// model sent with them.
    ToolRequest { calls: Vec<ToolCall>, text: String },
}

impl CompletionResult {
    /// Normalize the raw parts of a service response.
    ///
    /// Tool calls decide the shape when both are present; the text is kept
    /// on the request. A response with neither text
    /// nor calls becomes an empty `Final`, so the loop always terminates on a
    /// degenerate turn instead of erroring.
    pub fn from_parts(text: Option<String>, calls: Vec<ToolCall>) -> Self {
        if calls.is_empty() {
            CompletionResult::Final(text.unwrap_or_default())
        } else {
            CompletionResult::ToolRequest {
                calls,
                text: text.unwrap_or_default(),
            }
        }
    }

    /// Tool request without accompanying text
    pub fn tool_request(calls: Vec<ToolCall>) -> Self {
        CompletionResult::ToolRequest {
            calls,
            text: String::new(),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, CompletionResult::Final(_))
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            CompletionResult::ToolRequest { calls, .. } => calls,
            CompletionResult::Final(_) => &[],
        }
    }
}
