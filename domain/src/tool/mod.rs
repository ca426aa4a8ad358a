//! Tool domain module
//!
//! This module defines how the assistant describes and invokes **actions**:
//! task CRUD against the task service, reading and writing the project's
//! frontend/backend source trees, and restarting services. The actions are
//! executed remotely; this module only knows their shapes.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolRegistry │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (catalog)    │    │ (raw args)   │    │ (content)    │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ aliases: "create_task" → "add_task"
//!        └─ tools:   "add_task" → ToolDefinition (ordered)
//! ```
//!
//! # Tool Name Alias System
//!
//! Models occasionally invent near-miss names (`create_task` instead of
//! `add_task`). [`ToolRegistry`] keeps an alias table so these resolve without
//! an extra model round-trip. Aliases are never advertised in
//! [`ToolRegistry::definitions`].
//!
//! # Key Types
//!
//! - [`ToolName`]: the closed set of twelve capabilities
//! - [`ToolRegistry`]: ordered catalog + alias mappings, fixed after construction
//! - [`ToolDefinition`]: schema for a single tool (name, parameters, category)
//! - [`ToolCall`]: an invocation request carrying *unparsed* arguments
//! - [`ToolArguments`]: parsed argument object
//! - [`ToolResult`]: execution outcome fed back into the conversation
//! - [`ToolValidator`]: pure parameter validation

pub mod entities;
pub mod name;
pub mod registry;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolArguments, ToolCall, ToolCategory, ToolDefinition, ToolParameter};
pub use name::ToolName;
pub use registry::ToolRegistry;
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
