//! Configuration loader with multi-source merging

use super::error::ConfigError;
use super::file_config::FileConfig;
use super::resolved::ResolvedConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Environment variable carrying the completion credential
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
/// Environment variable carrying the tool-execution endpoint
pub const TOOL_ENDPOINT_ENV: &str = "MCP_TOOL_ENDPOINT";
/// Prefix for structured overrides (`TASKPILOT_AGENT__MAX_ROUNDS`)
pub const ENV_PREFIX: &str = "TASKPILOT_";

const PROJECT_FILE: &str = "taskpilot.toml";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `OPENROUTER_API_KEY` / `MCP_TOOL_ENDPOINT`
    /// 2. `TASKPILOT_*` environment variables (`__` separates sections)
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./taskpilot.toml`
    /// 5. XDG config: `$XDG_CONFIG_HOME/taskpilot/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        Ok(Self::figment(config_path)?.extract()?)
    }

    /// Load and validate in one step
    pub fn load_resolved(config_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
        ResolvedConfig::from_file(Self::load(config_path)?)
    }

    fn figment(config_path: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[API_KEY_ENV])
                    .map(|_| "completion.api_key".into()),
            )
            .merge(
                Env::raw()
                    .only(&[TOOL_ENDPOINT_ENV])
                    .map(|_| "tools.endpoint".into()),
            ))
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/taskpilot/config.toml` if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("taskpilot").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_FILE);
        path.exists().then_some(path)
    }

    /// Describe every configuration source, highest priority first
    pub fn config_sources(config_path: Option<&Path>) -> Vec<String> {
        let mut lines = Vec::new();

        for var in [API_KEY_ENV, TOOL_ENDPOINT_ENV] {
            let mark = if std::env::var_os(var).is_some() {
                "SET  "
            } else {
                "     "
            };
            lines.push(format!("[{}] Env:     {}", mark, var));
        }
        lines.push(format!("[     ] Env:     {}<SECTION>__<KEY>", ENV_PREFIX));

        if let Some(path) = config_path {
            lines.push(format!("[{}] Explicit: {}", found(path), path.display()));
        }

        lines.push(format!(
            "[{}] Project: ./{}",
            found(Path::new(PROJECT_FILE)),
            PROJECT_FILE
        ));

        if let Some(path) = Self::global_config_path() {
            lines.push(format!("[{}] Global:  {}", found(&path), path.display()));
        }

        lines.push("[     ] Default: built-in defaults".to_string());
        lines
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        for line in Self::config_sources(config_path) {
            println!("  {}", line);
        }
    }
}

fn found(path: &Path) -> &'static str {
    if path.exists() { "FOUND" } else { "     " }
}
