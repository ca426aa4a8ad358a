//! Infrastructure layer for taskpilot
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod completion;
pub mod config;
pub mod storage;
pub mod tools;

// Re-export commonly used types
pub use completion::OpenRouterGateway;
pub use config::{
    CompletionSettings, ConfigError, ConfigLoader, FileConfig, ResolvedConfig,
    ToolEndpointSettings,
};
pub use storage::{InMemoryConversationStore, JsonlConversationStore};
pub use tools::{HttpToolEndpoint, JsonSchemaToolConverter, task_assistant_registry};
