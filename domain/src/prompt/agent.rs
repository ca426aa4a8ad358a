//! Prompt templates for the task assistant

use crate::tool::registry::ToolRegistry;

/// Templates for the assistant's system prompt and degraded replies
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// Default system prompt, listing the registry's tools in registry order.
    pub fn system(registry: &ToolRegistry) -> String {
        let tool_descriptions = registry
            .definitions()
            .iter()
            .map(|t| format!("- {}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a task-management assistant. You help the user keep track of their tasks and, when asked, inspect or change the project's frontend and backend source files.

## Available Tools

{tool_descriptions}

## Guidelines

1. Use a tool whenever the user asks to create, list, complete, update or delete tasks. Never claim a change you did not make through a tool.
2. Task ids come from list_tasks or from earlier tool results. Look them up instead of guessing.
3. If a tool reports an error, read it, fix the arguments or explain the problem to the user.
4. Questions unrelated to tasks or the project are answered directly, without tools.
5. Keep answers short and confirm what was done."#
        )
    }

    /// Reply used when the round cap is reached.
    pub fn loop_exceeded_reply(max_rounds: u32) -> String {
        format!(
            "I wasn't able to finish this request within {} steps, so I stopped. \
             Some actions may already have been applied; please check your tasks and try \
             a simpler request.",
            max_rounds
        )
    }

    /// Reply used when the completion service fails terminally.
    pub fn completion_failed_reply(reason: &str) -> String {
        format!(
            "Sorry, I couldn't reach the language model service ({}). Please try again later.",
            reason
        )
    }

    /// Reply used when conversation state could not be loaded or saved.
    pub fn internal_error_reply(reason: &str) -> String {
        format!(
            "Sorry, something went wrong while handling your request ({}).",
            reason
        )
    }

    pub fn cancelled_reply() -> &'static str {
        "The request was cancelled."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolCategory, ToolDefinition};

    #[test]
    fn test_system_prompt_lists_tools_in_order() {
        let registry = ToolRegistry::from_definitions([
            ToolDefinition::new("add_task", "Create a new task", ToolCategory::Task),
            ToolDefinition::new("list_tasks", "List tasks", ToolCategory::Task),
        ])
        .unwrap();

        let prompt = AgentPromptTemplate::system(&registry);
        let add = prompt.find("- add_task: Create a new task").unwrap();
        let list = prompt.find("- list_tasks: List tasks").unwrap();
        assert!(add < list);
    }

    #[test]
    fn test_loop_exceeded_reply_mentions_limit() {
        assert!(AgentPromptTemplate::loop_exceeded_reply(2).contains("within 2 steps"));
    }
}
