//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_progress;
pub mod completion_gateway;
pub mod conversation_store;
pub mod tool_endpoint;
