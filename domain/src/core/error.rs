//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Tool '{0}' is registered more than once")]
    DuplicateTool(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool catalog is incomplete, missing: {}", .0.join(", "))]
    IncompleteCatalog(Vec<String>),

    #[error("Conversation invariant violated: {0}")]
    InvalidConversation(String),

    #[error("Invalid agent phase transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid conversation id '{0}'")]
    InvalidConversationId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let error = DomainError::InvalidTransition {
            from: "done".to_string(),
            to: "awaiting_completion".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid agent phase transition: done -> awaiting_completion"
        );
    }

    #[test]
    fn test_incomplete_catalog_lists_missing_tools() {
        let error = DomainError::IncompleteCatalog(vec![
            "add_task".to_string(),
            "restart_services".to_string(),
        ]);
        assert_eq!(
            error.to_string(),
            "Tool catalog is incomplete, missing: add_task, restart_services"
        );
    }
}
