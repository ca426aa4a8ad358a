//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every field has a default so partial files deserialize; required values
//! (credential, endpoint) are checked later by
//! [`ResolvedConfig::from_file`](super::ResolvedConfig::from_file).

mod agent;
mod completion;
mod repl;
mod storage;
mod tools;

pub use agent::FileAgentConfig;
pub use completion::{DEFAULT_BASE_URL, DEFAULT_MODEL, FileCompletionConfig};
pub use repl::FileReplConfig;
pub use storage::FileStorageConfig;
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Completion service settings
    pub completion: FileCompletionConfig,
    /// Tool-execution endpoint settings
    pub tools: FileToolsConfig,
    /// Agent loop settings
    pub agent: FileAgentConfig,
    /// Conversation persistence
    pub storage: FileStorageConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[completion]
api_key = "sk-or-test"
model = "anthropic/claude-3.5-haiku"
timeout_seconds = 30

[tools]
endpoint = "http://localhost:8000"

[agent]
max_rounds = 5

[storage]
conversation_dir = "/var/lib/taskpilot/conversations"

[repl]
show_progress = false
history_file = "~/.local/share/taskpilot/history.txt"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.completion.api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(config.completion.model, "anthropic/claude-3.5-haiku");
        assert_eq!(config.completion.timeout_seconds, 30);
        assert_eq!(config.completion.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.tools.endpoint.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.agent.max_rounds, 5);
        assert_eq!(
            config.storage.conversation_dir.as_deref(),
            Some(std::path::Path::new("/var/lib/taskpilot/conversations"))
        );
        assert!(!config.repl.show_progress);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[agent]
user_id = "7"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agent.user_id.as_deref(), Some("7"));
        // Defaults should apply
        assert_eq!(config.agent.max_rounds, 8);
        assert_eq!(config.completion.model, DEFAULT_MODEL);
        assert!(config.completion.api_key.is_none());
        assert!(config.storage.conversation_dir.is_none());
        assert!(config.repl.show_progress);
    }

    #[test]
    fn test_unknown_sections_are_ignored() {
        let toml_str = r#"
[telemetry]
enabled = true
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config, FileConfig::default());
    }
}
