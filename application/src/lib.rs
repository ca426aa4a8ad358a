//! Application layer for taskpilot
//!
//! This crate contains the agent loop use cases, the port definitions their
//! adapters implement, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionParams, RetryPolicy};
pub use ports::{
    agent_progress::{AgentProgressNotifier, NoAgentProgress},
    completion_gateway::{CompletionError, CompletionGateway},
    conversation_store::{ConversationStore, StoreError},
    tool_endpoint::{ToolEndpoint, ToolEndpointError},
};
pub use use_cases::dispatch_tool::DispatchToolUseCase;
pub use use_cases::process_message::{
    NoConversationStore, ProcessMessageError, ProcessMessageInput, ProcessMessageOutput,
    ProcessMessageUseCase,
};
pub use use_cases::session_locks::SessionLocks;
pub use use_cases::tool_helpers::{tool_args_preview, tool_result_preview};
