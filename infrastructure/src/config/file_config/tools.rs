//! Tool endpoint configuration from TOML (`[tools]` section)

use serde::{Deserialize, Serialize};

/// Raw tool-execution endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Base address of the tool-execution service (`MCP_TOOL_ENDPOINT`)
    pub endpoint: Option<String>,
    /// Per-call timeout
    pub timeout_seconds: u64,
    /// Retries after a transport failure or non-success status
    pub max_retries: u32,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_seconds: 15,
            max_retries: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;

    #[test]
    fn test_tools_section() {
        let toml_str = r#"
[tools]
endpoint = "http://localhost:8000/mcp"
max_retries = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.tools.endpoint.as_deref(),
            Some("http://localhost:8000/mcp")
        );
        assert_eq!(config.tools.max_retries, 0);
        assert_eq!(config.tools.timeout_seconds, 15);
    }
}
