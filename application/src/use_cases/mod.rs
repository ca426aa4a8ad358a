//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod dispatch_tool;
pub mod process_message;
pub mod session_locks;
pub mod tool_helpers;
