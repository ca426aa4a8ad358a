//! Tool adapters
//!
//! - `catalog`: the twelve tool definitions and the assistant's registry
//! - `schema`: conversion of definitions into function-calling JSON Schema
//! - `http_endpoint`: the HTTP client for the remote tool-execution service

pub mod catalog;
pub mod http_endpoint;
pub mod schema;

pub use catalog::{TOOL_ALIASES, task_assistant_registry};
pub use http_endpoint::HttpToolEndpoint;
pub use schema::JsonSchemaToolConverter;
