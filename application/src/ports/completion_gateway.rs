//! Completion gateway port
//!
//! Defines the interface for talking to the language-model completion service.

use async_trait::async_trait;
use std::time::Duration;
use taskpilot_domain::{CompletionResult, Conversation, ToolDefinition};
use thiserror::Error;

/// Errors that can occur during a completion call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Invalid or missing credential. Never retried.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Network failure, rate limiting or server error. Retried with backoff.
    #[error("Transient completion failure: {0}")]
    Transient(String),

    /// The service refused the request (bad model name, malformed request).
    #[error("Completion request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response could not be decoded.
    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),

    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),
}

impl CompletionError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::Transient(_) | CompletionError::Timeout(_)
        )
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, CompletionError::Authentication(_))
    }
}

/// Gateway to the completion service
///
/// One call sends the full conversation plus the tool catalog and yields
/// either a final answer or a list of tool calls. Implementations perform a
/// single request; retries and timeouts are applied by the caller.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(
        &self,
        conversation: &Conversation,
        tools: &[ToolDefinition],
    ) -> Result<CompletionResult, CompletionError>;

    /// Model identifier, for logs and progress output
    fn model_name(&self) -> &str {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        assert!(CompletionError::Transient("503".into()).is_retryable());
        assert!(CompletionError::Timeout(Duration::from_secs(60)).is_retryable());
        assert!(!CompletionError::Authentication("bad key".into()).is_retryable());
        assert!(
            !CompletionError::Rejected {
                status: 400,
                message: "unknown model".into()
            }
            .is_retryable()
        );
        assert!(!CompletionError::InvalidResponse("eof".into()).is_retryable());

        assert!(CompletionError::Authentication("bad key".into()).is_authentication());
        assert!(!CompletionError::Transient("503".into()).is_authentication());
    }
}
