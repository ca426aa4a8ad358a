//! Prompt domain
//!
//! System prompt and user-facing fallback replies.

pub mod agent;

pub use agent::AgentPromptTemplate;
