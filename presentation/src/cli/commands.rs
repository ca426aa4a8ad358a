//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;
use taskpilot_domain::ConversationId;

/// CLI arguments for taskpilot
#[derive(Parser, Debug)]
#[command(name = "taskpilot")]
#[command(author, version, about = "Natural-language task management assistant")]
#[command(long_about = r#"
Taskpilot turns plain-language requests into actions on your task list and
project: it asks a language model what to do, runs the requested tools, and
reports back.

Configuration is loaded from (in priority order):
1. OPENROUTER_API_KEY, MCP_TOOL_ENDPOINT
2. TASKPILOT_<SECTION>__<KEY> environment variables
3. --config <path>                         Explicit config file
4. ./taskpilot.toml                        Project-level config
5. ~/.config/taskpilot/config.toml         Global config

Example:
  taskpilot "Add a task to buy milk, high priority"
  taskpilot --conversation groceries "What's still open?"
  taskpilot --chat
"#)]
pub struct Cli {
    /// The request to process (not required in chat mode)
    pub message: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Continue (or start) a persisted conversation
    #[arg(long, value_name = "ID")]
    pub conversation: Option<ConversationId>,

    /// Override the maximum number of completion rounds per message
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
