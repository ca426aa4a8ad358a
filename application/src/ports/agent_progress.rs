//! Agent execution progress port.
//!
//! [`AgentProgressNotifier`] is an **output port** that the presentation layer
//! implements to show the user what the agent loop is doing. It is separate
//! from diagnostic logging (`tracing`).
//!
//! # Example Implementation
//!
//! ```ignore
//! use taskpilot_application::ports::agent_progress::AgentProgressNotifier;
//!
//! struct MyProgress;
//!
//! impl AgentProgressNotifier for MyProgress {
//!     fn on_round_start(&self, round: u32, max_rounds: u32) {
//!         println!("Round {}/{}", round, max_rounds);
//!     }
//! }
//! ```

use taskpilot_domain::{AgentPhase, LoopOutcome, ToolCall, ToolResult};

/// Progress notifier for agent execution.
///
/// All methods have default no-op implementations, so implementers only
/// need to override the callbacks they care about.
pub trait AgentProgressNotifier: Send + Sync {
    /// Called when the loop moves to a new phase
    fn on_phase_change(&self, _phase: AgentPhase) {}

    /// Called before each completion request
    fn on_round_start(&self, _round: u32, _max_rounds: u32) {}

    /// Called when a completion attempt failed and will be retried
    fn on_completion_retry(&self, _attempt: u32, _max_retries: u32, _error: &str) {}

    /// Called when a tool call is about to be dispatched
    fn on_tool_call(&self, _call: &ToolCall) {}

    /// Called when an alias was resolved to its canonical tool
    fn on_tool_resolved(&self, _requested: &str, _canonical: &str) {}

    /// Called when a tool endpoint attempt failed and will be retried
    fn on_tool_retry(&self, _tool_name: &str, _attempt: u32, _max_retries: u32, _error: &str) {}

    /// Called once per dispatched call with its final result
    fn on_tool_result(&self, _result: &ToolResult) {}

    /// Called when the run ends
    fn on_complete(&self, _outcome: LoopOutcome, _rounds: u32) {}
}

/// No-op implementation for callers that don't need progress output
pub struct NoAgentProgress;

impl AgentProgressNotifier for NoAgentProgress {}
