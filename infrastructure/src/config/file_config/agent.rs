//! Agent loop configuration from TOML (`[agent]` section)

use serde::{Deserialize, Serialize};

/// Raw agent configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Completion rounds allowed per user message
    pub max_rounds: u32,
    /// Acting user passed to task tools
    pub user_id: Option<String>,
    /// Replaces the built-in system prompt for new conversations
    pub system_prompt: Option<String>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            max_rounds: 8,
            user_id: None,
            system_prompt: None,
        }
    }
}
