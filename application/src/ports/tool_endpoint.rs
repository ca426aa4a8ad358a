//! Tool endpoint port
//!
//! Defines the interface to the remote service that actually performs tool
//! actions (task mutations, file access, service restarts).

use async_trait::async_trait;
use std::time::Duration;
use taskpilot_domain::ToolArguments;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolEndpointError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Tool call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Tool endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The tool ran and reported a failure
    #[error("{0}")]
    Remote(String),

    #[error("Invalid tool endpoint response: {0}")]
    InvalidResponse(String),
}

impl ToolEndpointError {
    /// Transport, timeout and status failures are retried; a remote error is
    /// the tool's own answer and retrying would repeat the side effect.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ToolEndpointError::Transport(_)
                | ToolEndpointError::Timeout(_)
                | ToolEndpointError::Status { .. }
        )
    }
}

/// Port for the remote tool-execution endpoint
///
/// Accepts `{name, arguments}` and returns the tool's structured result. The
/// arguments have already been parsed and validated by the dispatcher.
#[async_trait]
pub trait ToolEndpoint: Send + Sync {
    async fn call(
        &self,
        name: &str,
        arguments: &ToolArguments,
    ) -> Result<serde_json::Value, ToolEndpointError>;
}
