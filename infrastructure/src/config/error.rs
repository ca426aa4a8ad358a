//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration failure. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(Box<figment::Error>),

    #[error("Config file not found: {}", .0.display())]
    MissingConfigFile(PathBuf),

    #[error(
        "Missing completion service credential: set OPENROUTER_API_KEY or [completion].api_key"
    )]
    MissingCredential,

    #[error("Missing tool-execution endpoint: set MCP_TOOL_ENDPOINT or [tools].endpoint")]
    MissingToolEndpoint,

    #[error("Invalid URL for {field}: '{value}' ({reason})")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(Box::new(e))
    }
}
