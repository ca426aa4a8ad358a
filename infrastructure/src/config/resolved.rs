//! Validated runtime configuration
//!
//! [`ResolvedConfig`] is produced once at startup from the merged
//! [`FileConfig`]. Anything missing or malformed fails here, so the agent
//! loop never sees a configuration error.

use super::error::ConfigError;
use super::file_config::FileConfig;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use taskpilot_application::{ExecutionParams, RetryPolicy};

/// Completion service connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct CompletionSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Tool-execution endpoint settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolEndpointSettings {
    pub endpoint: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

/// Immutable configuration the binary wires adapters from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub completion: CompletionSettings,
    pub tools: ToolEndpointSettings,
    pub max_rounds: u32,
    pub user_id: Option<String>,
    pub system_prompt: Option<String>,
    pub conversation_dir: Option<PathBuf>,
    pub show_progress: bool,
    pub history_file: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn from_file(file: FileConfig) -> Result<Self, ConfigError> {
        let api_key = non_blank(file.completion.api_key).ok_or(ConfigError::MissingCredential)?;
        let endpoint = non_blank(file.tools.endpoint).ok_or(ConfigError::MissingToolEndpoint)?;

        check_url("completion.base_url", &file.completion.base_url)?;
        check_url("tools.endpoint", &endpoint)?;

        if file.agent.max_rounds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.max_rounds",
                reason: "must be at least 1".to_string(),
            });
        }
        let completion_timeout = positive_seconds(
            "completion.timeout_seconds",
            file.completion.timeout_seconds,
        )?;
        let tool_timeout = positive_seconds("tools.timeout_seconds", file.tools.timeout_seconds)?;

        if file.completion.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "completion.model",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            completion: CompletionSettings {
                api_key,
                base_url: file.completion.base_url,
                model: file.completion.model,
                timeout: completion_timeout,
                retry: RetryPolicy::completion_default()
                    .with_max_retries(file.completion.max_retries),
            },
            tools: ToolEndpointSettings {
                endpoint,
                timeout: tool_timeout,
                retry: RetryPolicy::tool_default().with_max_retries(file.tools.max_retries),
            },
            max_rounds: file.agent.max_rounds,
            user_id: non_blank(file.agent.user_id),
            system_prompt: non_blank(file.agent.system_prompt),
            conversation_dir: file.storage.conversation_dir,
            show_progress: file.repl.show_progress,
            history_file: file.repl.history_file.map(|p| expand_home(&p)),
        })
    }

    /// Loop and dispatcher parameters derived from this configuration
    pub fn execution_params(&self) -> ExecutionParams {
        let params = ExecutionParams::default()
            .with_max_rounds(self.max_rounds)
            .with_completion_retry(self.completion.retry)
            .with_completion_timeout(self.completion.timeout)
            .with_tool_retry(self.tools.retry)
            .with_tool_timeout(self.tools.timeout);

        match &self.user_id {
            Some(user_id) => params.with_user_id(user_id.clone()),
            None => params,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

fn positive_seconds(field: &'static str, seconds: u64) -> Result<Duration, ConfigError> {
    if seconds == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
