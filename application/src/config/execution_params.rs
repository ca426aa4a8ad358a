//! Execution parameters: agent loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control
//! [`ProcessMessageUseCase`](crate::use_cases::process_message::ProcessMessageUseCase)
//! and [`DispatchToolUseCase`](crate::use_cases::dispatch_tool::DispatchToolUseCase).
//! The value is built once at startup and never mutated afterwards.

use super::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Agent loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of completion rounds per user message (iteration guard).
    pub max_rounds: u32,
    /// Retry policy for completion calls.
    pub completion_retry: RetryPolicy,
    /// Timeout applied to each completion attempt.
    pub completion_timeout: Duration,
    /// Retry policy for tool endpoint calls.
    pub tool_retry: RetryPolicy,
    /// Timeout applied to each tool endpoint attempt.
    pub tool_timeout: Duration,
    /// Acting user, injected into task-tool arguments.
    pub user_id: Option<String>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_rounds: 8,
            completion_retry: RetryPolicy::completion_default(),
            completion_timeout: Duration::from_secs(60),
            tool_retry: RetryPolicy::tool_default(),
            tool_timeout: Duration::from_secs(15),
            user_id: None,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_completion_retry(mut self, policy: RetryPolicy) -> Self {
        self.completion_retry = policy;
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn with_tool_retry(mut self, policy: RetryPolicy) -> Self {
        self.tool_retry = policy;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_rounds, 8);
        assert_eq!(params.completion_timeout, Duration::from_secs(60));
        assert_eq!(params.tool_timeout, Duration::from_secs(15));
        assert_eq!(params.tool_retry.max_retries, 2);
        assert!(params.user_id.is_none());
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_rounds(2)
            .with_tool_retry(RetryPolicy::none())
            .with_user_id("user-7");

        assert_eq!(params.max_rounds, 2);
        assert_eq!(params.tool_retry.max_attempts(), 1);
        assert_eq!(params.user_id.as_deref(), Some("user-7"));
    }
}
