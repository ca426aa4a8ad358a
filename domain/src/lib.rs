//! Domain layer for taskpilot
//!
//! This crate contains the core types of the task assistant: conversations,
//! the tool catalog and the agent loop state machine. It has no dependencies
//! on infrastructure or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Agent loop
//!
//! One user message drives a bounded number of *completion rounds*. Each
//! round asks the language model for either a final answer or a set of tool
//! calls; tool results are appended to the [`Conversation`] and the next round
//! starts. [`LoopRun`] tracks the phase and enforces the round cap.
//!
//! ## Tools
//!
//! The assistant can act through exactly twelve tools ([`ToolName`]), held in
//! an ordered [`ToolRegistry`]. Tool failures never abort a run: they become
//! [`ToolResult`]s with `is_error` set and are shown to the model.

pub mod agent;
pub mod conversation;
pub mod core;
pub mod prompt;
pub mod tool;

// Re-export commonly used types
pub use agent::{AgentPhase, LoopOutcome, LoopRun};
pub use conversation::{CompletionResult, Conversation, ConversationId, Message, Role};
pub use core::{error::DomainError, string::truncate};
pub use prompt::AgentPromptTemplate;
pub use tool::{
    DefaultToolValidator, ToolArguments, ToolCall, ToolCategory, ToolDefinition, ToolError,
    ToolName, ToolParameter, ToolRegistry, ToolResult, ToolResultMetadata, ToolValidator,
};
