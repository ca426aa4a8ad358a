//! Configuration file loading for taskpilot
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `OPENROUTER_API_KEY` and `MCP_TOOL_ENDPOINT`
//! 2. `TASKPILOT_<SECTION>__<KEY>` environment variables
//! 3. `--config <path>` specified file
//! 4. Project root: `./taskpilot.toml`
//! 5. XDG config: `$XDG_CONFIG_HOME/taskpilot/config.toml`
//! 6. Default values
//!
//! The merged [`FileConfig`] is then validated into a [`ResolvedConfig`].

mod error;
mod file_config;
mod loader;
mod resolved;

pub use error::ConfigError;
pub use file_config::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, FileAgentConfig, FileCompletionConfig, FileConfig,
    FileReplConfig, FileStorageConfig, FileToolsConfig,
};
pub use loader::{API_KEY_ENV, ConfigLoader, ENV_PREFIX, TOOL_ENDPOINT_ENV};
pub use resolved::{CompletionSettings, ResolvedConfig, ToolEndpointSettings};
