//! CLI entrypoint for taskpilot
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use taskpilot_application::{
    AgentProgressNotifier, ConversationStore, NoAgentProgress, ProcessMessageInput,
    ProcessMessageUseCase,
};
use taskpilot_infrastructure::{
    ConfigLoader, HttpToolEndpoint, InMemoryConversationStore, JsonlConversationStore,
    OpenRouterGateway, task_assistant_registry,
};
use taskpilot_presentation::{ChatRepl, Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber. The returned guard flushes the log file on drop.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    if !cli.chat && cli.message.is_none() {
        bail!("A message is required. Use --chat for interactive mode.");
    }

    let mut config = ConfigLoader::load_resolved(cli.config.as_deref())
        .context("Configuration error")?;
    if let Some(max_rounds) = cli.max_rounds {
        if max_rounds == 0 {
            bail!("--max-rounds must be at least 1");
        }
        config.max_rounds = max_rounds;
    }

    info!(
        model = %config.completion.model,
        tool_endpoint = %config.tools.endpoint,
        max_rounds = config.max_rounds,
        "Starting taskpilot"
    );

    // === Dependency Injection ===
    let registry = Arc::new(task_assistant_registry()?);
    let gateway = Arc::new(OpenRouterGateway::from_settings(&config.completion));
    let endpoint = Arc::new(HttpToolEndpoint::new(&config.tools.endpoint));
    let store: Arc<dyn ConversationStore> = match &config.conversation_dir {
        Some(dir) => Arc::new(
            JsonlConversationStore::new(dir)
                .with_context(|| format!("Cannot open conversation directory {}", dir.display()))?,
        ),
        None => Arc::new(InMemoryConversationStore::new()),
    };

    let mut use_case = ProcessMessageUseCase::with_conversation_store(
        gateway,
        endpoint,
        store,
        registry,
        config.execution_params(),
    );
    if let Some(prompt) = &config.system_prompt {
        use_case = use_case.with_system_prompt(prompt.clone());
    }

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case, cli.conversation)
            .with_progress(!cli.quiet && config.show_progress)
            .with_history_file(config.history_file.clone());
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(message) = cli.message else {
        bail!("A message is required. Use --chat for interactive mode.");
    };

    // Ctrl-C stops the loop at the next round boundary
    let cancellation = CancellationToken::new();
    {
        let cancellation = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancellation.cancel();
            }
        });
    }
    let use_case = use_case.with_cancellation(cancellation);

    let mut input = ProcessMessageInput::new(message);
    if let Some(id) = cli.conversation {
        input = input.in_conversation(id);
    }

    let progress: Box<dyn AgentProgressNotifier> = if cli.quiet {
        Box::new(NoAgentProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let output = use_case.execute_with_progress(input, progress.as_ref()).await;

    println!("{}", ConsoleFormatter::format_reply(&output));
    if !cli.quiet {
        eprintln!("{}", ConsoleFormatter::format_summary(&output));
    }

    Ok(if output.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
