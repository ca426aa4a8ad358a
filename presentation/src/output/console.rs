//! Console output for agent replies

use colored::Colorize;
use taskpilot_application::ProcessMessageOutput;
use taskpilot_domain::LoopOutcome;

/// Formats agent replies for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The reply, prefixed with a label when the run did not complete normally
    pub fn format_reply(output: &ProcessMessageOutput) -> String {
        match Self::outcome_label(output.outcome) {
            Some(label) => format!("{} {}", label, output.reply),
            None => output.reply.clone(),
        }
    }

    /// One-line run statistics
    pub fn format_summary(output: &ProcessMessageOutput) -> String {
        let rounds = plural(output.rounds as usize, "round");
        let calls = plural(output.tool_calls, "tool call");
        format!("{} | {} | {}", output.outcome.as_str(), rounds, calls)
            .dimmed()
            .to_string()
    }

    fn outcome_label(outcome: LoopOutcome) -> Option<colored::ColoredString> {
        match outcome {
            LoopOutcome::Completed => None,
            LoopOutcome::LoopExceeded => Some("[stopped]".yellow().bold()),
            LoopOutcome::Cancelled => Some("[cancelled]".yellow().bold()),
            LoopOutcome::CompletionFailed | LoopOutcome::Internal => {
                Some("[error]".red().bold())
            }
        }
    }

    /// Create a header line
    pub fn header(title: &str) -> String {
        let line = "═".repeat(title.len() + 4);
        format!(
            "{}\n{}\n{}",
            line.cyan(),
            format!("  {}  ", title).cyan().bold(),
            line.cyan()
        )
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", n, noun)
    }
}
