//! Agent domain module
//!
//! Phases, outcome and round accounting for the agent loop that turns one
//! user message into completion rounds and tool dispatches.

pub mod entities;

pub use entities::{AgentPhase, LoopOutcome, LoopRun};
