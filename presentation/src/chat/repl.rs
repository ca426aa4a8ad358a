//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::{ConsoleFormatter, ProgressReporter};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use taskpilot_application::{
    CompletionGateway, ConversationStore, NoAgentProgress, ProcessMessageInput,
    ProcessMessageUseCase, ToolEndpoint,
};
use taskpilot_domain::ConversationId;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// What the loop should do after a slash command
#[derive(Debug, PartialEq, Eq)]
enum CommandAction {
    Continue,
    NewConversation,
    Quit,
}

/// Interactive chat REPL
///
/// Every line is sent to the agent as part of one persisted conversation.
/// Ctrl-C while a message is being processed cancels that message only.
pub struct ChatRepl<G, E, S>
where
    G: CompletionGateway + 'static,
    E: ToolEndpoint + 'static,
    S: ConversationStore + ?Sized + 'static,
{
    use_case: ProcessMessageUseCase<G, E, S>,
    conversation_id: Option<ConversationId>,
    show_progress: bool,
    history_path: Option<PathBuf>,
}

impl<G, E, S> ChatRepl<G, E, S>
where
    G: CompletionGateway + 'static,
    E: ToolEndpoint + 'static,
    S: ConversationStore + ?Sized + 'static,
{
    /// Create a new ChatRepl, continuing `conversation_id` or starting fresh
    pub fn new(
        use_case: ProcessMessageUseCase<G, E, S>,
        conversation_id: Option<ConversationId>,
    ) -> Self {
        Self {
            use_case,
            conversation_id: conversation_id.or_else(fresh_conversation_id),
            show_progress: true,
            history_path: dirs::data_dir().map(|p| p.join("taskpilot").join("history.txt")),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Override the readline history file
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.history_path = path;
        }
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        match self.handle_command(line) {
                            CommandAction::Quit => break,
                            CommandAction::NewConversation => {
                                self.conversation_id = fresh_conversation_id();
                                println!("Started {}", self.conversation_label());
                            }
                            CommandAction::Continue => {}
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_line(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn conversation_label(&self) -> String {
        match &self.conversation_id {
            Some(id) => format!("conversation '{}'", id),
            None => "a single-turn session".to_string(),
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("Taskpilot - Chat Mode"));
        println!();
        println!("Continuing {}", self.conversation_label());
        println!("Type /help for commands.");
        println!();
    }

    fn handle_command(&self, cmd: &str) -> CommandAction {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                CommandAction::Quit
            }
            "/new" => CommandAction::NewConversation,
            "/id" => {
                println!("Current: {}", self.conversation_label());
                CommandAction::Continue
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /new             - Start a new conversation");
                println!("  /id              - Show the current conversation id");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                CommandAction::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                CommandAction::Continue
            }
        }
    }

    async fn process_line(&self, line: &str) {
        println!();

        let token = CancellationToken::new();
        let interrupt = {
            let token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
            })
        };

        let use_case = self.use_case.clone().with_cancellation(token);
        let mut input = ProcessMessageInput::new(line);
        if let Some(id) = &self.conversation_id {
            input = input.in_conversation(id.clone());
        }

        let output = if self.show_progress {
            let progress = ProgressReporter::new();
            use_case.execute_with_progress(input, &progress).await
        } else {
            use_case.execute_with_progress(input, &NoAgentProgress).await
        };
        interrupt.abort();

        println!("{}", ConsoleFormatter::format_reply(&output));
        if self.show_progress {
            println!("{}", ConsoleFormatter::format_summary(&output));
        }
        println!();
    }
}

/// Timestamped id for a new chat conversation
fn fresh_conversation_id() -> Option<ConversationId> {
    let stamp = chrono::Local::now().format("chat-%Y%m%d-%H%M%S").to_string();
    match ConversationId::new(stamp) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Could not create a conversation id: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_conversation_id_is_valid() {
        let id = fresh_conversation_id().unwrap();
        assert!(id.as_str().starts_with("chat-"));
    }
}
