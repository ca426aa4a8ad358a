//! Dispatch Tool use case
//!
//! Executes one model-requested [`ToolCall`] against the remote tool endpoint.
//!
//! ```text
//! resolve name ─▶ parse args ─▶ validate ─▶ scope to user ─▶ endpoint (timeout + retry)
//!      │              │             │                              │
//!      └──────────────┴─────────────┴──────── ToolResult ◀─────────┘
//! ```
//!
//! Every path ends in a [`ToolResult`]; nothing here returns an error to the
//! agent loop. Failures become `is_error` results the model can react to.

use crate::config::{ExecutionParams, RetryPolicy};
use crate::ports::agent_progress::AgentProgressNotifier;
use crate::ports::tool_endpoint::{ToolEndpoint, ToolEndpointError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use taskpilot_domain::{
    DefaultToolValidator, ToolArguments, ToolCall, ToolDefinition, ToolError, ToolRegistry,
    ToolResult, ToolValidator,
};
use tracing::{debug, warn};

/// Argument key carrying the acting user for task tools
pub const USER_ID_ARG: &str = "user_id";

/// Use case for dispatching a single tool call
pub struct DispatchToolUseCase<E: ToolEndpoint + 'static> {
    endpoint: Arc<E>,
    registry: Arc<ToolRegistry>,
    validator: DefaultToolValidator,
    retry: RetryPolicy,
    timeout: Duration,
    user_id: Option<String>,
}

impl<E: ToolEndpoint + 'static> Clone for DispatchToolUseCase<E> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            registry: self.registry.clone(),
            validator: self.validator.clone(),
            retry: self.retry,
            timeout: self.timeout,
            user_id: self.user_id.clone(),
        }
    }
}

impl<E: ToolEndpoint + 'static> DispatchToolUseCase<E> {
    pub fn new(endpoint: Arc<E>, registry: Arc<ToolRegistry>, params: &ExecutionParams) -> Self {
        Self {
            endpoint,
            registry,
            validator: DefaultToolValidator,
            retry: params.tool_retry,
            timeout: params.tool_timeout,
            user_id: params.user_id.clone(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch one call. Never fails; errors are carried in the result.
    pub async fn invoke(&self, call: &ToolCall, progress: &dyn AgentProgressNotifier) -> ToolResult {
        let started = Instant::now();
        let (result, attempts) = match self.prepare(call, progress) {
            Ok((definition, args)) => self.call_endpoint(call, definition, &args, progress).await,
            Err(error) => {
                warn!(
                    tool = %call.name,
                    tool_call_id = %call.id,
                    code = %error.code,
                    "Rejected tool call: {}",
                    error.message
                );
                (Err(error), 0)
            }
        };

        let result = match result {
            Ok(content) => ToolResult::success(&call.id, &call.name, content),
            Err(error) => ToolResult::failure(&call.id, &call.name, error),
        };
        result
            .with_attempts(attempts)
            .with_duration(millis(started.elapsed()))
    }

    /// Resolve, parse, validate and scope the call's arguments.
    fn prepare(
        &self,
        call: &ToolCall,
        progress: &dyn AgentProgressNotifier,
    ) -> Result<(&ToolDefinition, ToolArguments), ToolError> {
        let definition = self.registry.resolve(&call.name).map_err(|_| {
            let available: Vec<&str> = self.registry.names().collect();
            ToolError::unknown_tool(&call.name)
                .with_details(format!("Available tools: {}", available.join(", ")))
        })?;

        if definition.name != call.name {
            debug!(requested = %call.name, canonical = %definition.name, "Resolved tool alias");
            progress.on_tool_resolved(&call.name, &definition.name);
        }

        let mut args = call.parse_arguments()?;

        // The acting user is decided by configuration, never by the model
        let user_scoped = definition.category.is_user_scoped();
        if user_scoped {
            args.remove(USER_ID_ARG);
        }

        self.validator
            .validate(&args, definition)
            .map_err(ToolError::invalid_argument)?;

        if user_scoped && let Some(user_id) = &self.user_id {
            args.insert(USER_ID_ARG, user_id.as_str());
        }

        Ok((definition, args))
    }

    /// Call the endpoint with a per-attempt timeout and bounded retries.
    ///
    /// Returns the outcome and the number of attempts made.
    async fn call_endpoint(
        &self,
        call: &ToolCall,
        definition: &ToolDefinition,
        args: &ToolArguments,
        progress: &dyn AgentProgressNotifier,
    ) -> (Result<String, ToolError>, u32) {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(tool = %definition.name, tool_call_id = %call.id, attempt, "Calling tool endpoint");

            let outcome =
                match tokio::time::timeout(self.timeout, self.endpoint.call(&definition.name, args))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(ToolEndpointError::Timeout(self.timeout)),
                };

            match outcome {
                Ok(value) => return (Ok(result_content(value)), attempt),
                Err(e) if e.is_retryable() && attempt <= self.retry.max_retries => {
                    warn!(
                        tool = %definition.name,
                        tool_call_id = %call.id,
                        attempt,
                        max_retries = self.retry.max_retries,
                        "Tool endpoint attempt failed, retrying: {}",
                        e
                    );
                    progress.on_tool_retry(
                        &definition.name,
                        attempt,
                        self.retry.max_retries,
                        &e.to_string(),
                    );
                    tokio::time::sleep(self.retry.delay_for(attempt - 1)).await;
                }
                Err(e) => {
                    warn!(
                        tool = %definition.name,
                        tool_call_id = %call.id,
                        attempt,
                        "Tool call failed: {}",
                        e
                    );
                    return (Err(to_tool_error(&definition.name, e, attempt)), attempt);
                }
            }
        }
    }
}

/// Text shown to the model for a successful call
/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn result_content(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn to_tool_error(tool: &str, error: ToolEndpointError, attempts: u32) -> ToolError {
    let attempts_note = format!("gave up after {} attempt(s)", attempts);
    match error {
        ToolEndpointError::Remote(message) => ToolError::remote(message),
        ToolEndpointError::Timeout(after) => {
            ToolError::timeout(format!("{} (no response within {:?})", tool, after))
                .with_details(attempts_note)
        }
        ToolEndpointError::InvalidResponse(message) => {
            ToolError::execution_failed(format!("Invalid response from tool endpoint: {}", message))
        }
        other @ (ToolEndpointError::Transport(_) | ToolEndpointError::Status { .. }) => {
            ToolError::execution_failed(other.to_string()).with_details(attempts_note)
        }
    }
}
