//! Shared helpers for tool use cases.

use taskpilot_domain::{ToolCall, ToolResult, truncate};

/// Extract a short preview string from tool call arguments.
///
/// Looks for well-known keys (`title`, `task_id`, `path`, `service`, `status`)
/// first, then falls back to the first string value found. Unparseable
/// payloads are previewed verbatim.
pub fn tool_args_preview(call: &ToolCall) -> String {
    let Ok(args) = call.parse_arguments() else {
        return truncate(call.arguments.trim(), 50);
    };

    let keys = ["title", "task_id", "path", "service", "status"];
    for key in &keys {
        match args.get(key) {
            Some(serde_json::Value::String(s)) => return truncate(s, 50),
            Some(serde_json::Value::Number(n)) => return format!("#{}", n),
            _ => {}
        }
    }
    // Fallback: first string value
    args.keys()
        .find_map(|k| args.get_string(k))
        .map(|s| truncate(s, 50))
        .unwrap_or_default()
}

/// One-line summary of a result's content, for progress output.
pub fn tool_result_preview(result: &ToolResult) -> String {
    match result.error() {
        Some(err) => truncate(&err.to_string(), 80),
        None => truncate(result.content.lines().next().unwrap_or(""), 80),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpilot_domain::ToolError;

    #[test]
    fn test_title_key_preferred() {
        let call = ToolCall::with_json(
            "c1",
            "add_task",
            serde_json::json!({"description": "2 litres", "title": "Buy milk"}),
        );
        assert_eq!(tool_args_preview(&call), "Buy milk");
    }

    #[test]
    fn test_numeric_task_id() {
        let call = ToolCall::with_json("c1", "complete_task", serde_json::json!({"task_id": 4}));
        assert_eq!(tool_args_preview(&call), "#4");
    }

    #[test]
    fn test_fallback_to_first_string() {
        let call = ToolCall::with_json("c1", "update_task", serde_json::json!({"priority": "high"}));
        assert_eq!(tool_args_preview(&call), "high");
    }

    #[test]
    fn test_no_args() {
        let call = ToolCall::new("c1", "list_tasks", "");
        assert_eq!(tool_args_preview(&call), "");
    }

    #[test]
    fn test_malformed_args_shown_raw() {
        let call = ToolCall::new("c1", "add_task", "{title: oops");
        assert_eq!(tool_args_preview(&call), "{title: oops");
    }

    #[test]
    fn test_long_value_truncated() {
        let long = "x".repeat(200);
        let call = ToolCall::with_json("c1", "add_task", serde_json::json!({"title": long}));
        let preview = tool_args_preview(&call);
        assert_eq!(preview.len(), 50);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_result_preview() {
        let ok = ToolResult::success("c1", "list_tasks", "3 tasks\nmore");
        assert_eq!(tool_result_preview(&ok), "3 tasks");

        let err = ToolResult::failure("c1", "add_task", ToolError::remote("quota exceeded"));
        assert_eq!(tool_result_preview(&err), "[REMOTE_ERROR] quota exceeded");
    }
}
