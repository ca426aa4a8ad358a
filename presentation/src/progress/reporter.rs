//! Progress reporting for the agent loop

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use taskpilot_application::{AgentProgressNotifier, tool_args_preview, tool_result_preview};
use taskpilot_domain::{AgentPhase, LoopOutcome, ToolCall, ToolResult};

/// Reports agent progress with a spinner and one line per tool call
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        let spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pb) = spinner.as_ref() {
            f(pb);
        }
    }

    /// Print above the spinner, or plainly when none is active
    fn line(&self, text: String) {
        let spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        match spinner.as_ref() {
            Some(pb) => pb.println(text),
            None => eprintln!("{}", text),
        }
    }

    fn finish(&self) {
        if let Some(pb) = self
            .spinner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentProgressNotifier for ProgressReporter {
    fn on_phase_change(&self, phase: AgentPhase) {
        if phase == AgentPhase::AwaitingToolResults {
            self.with_spinner(|pb| pb.set_message("running tools..."));
        }
    }

    fn on_round_start(&self, round: u32, max_rounds: u32) {
        self.finish();

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Round {}/{}", round, max_rounds));
        pb.set_message("thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));

        *self.spinner.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_completion_retry(&self, attempt: u32, max_retries: u32, error: &str) {
        self.with_spinner(|pb| {
            pb.set_message(format!(
                "{} {}",
                format!("retry {}/{}:", attempt, max_retries).yellow(),
                error
            ))
        });
    }

    fn on_tool_call(&self, call: &ToolCall) {
        self.line(format!(
            "  {} {} {}",
            "->".cyan(),
            call.name.bold(),
            tool_args_preview(call).dimmed()
        ));
    }

    fn on_tool_resolved(&self, requested: &str, canonical: &str) {
        self.line(format!("     {}", format!("({} = {})", requested, canonical).dimmed()));
    }

    fn on_tool_retry(&self, tool_name: &str, attempt: u32, max_retries: u32, error: &str) {
        self.line(format!(
            "  {} {} retry {}/{}: {}",
            "~".yellow(),
            tool_name,
            attempt,
            max_retries,
            error
        ));
    }

    fn on_tool_result(&self, result: &ToolResult) {
        let mark = if result.is_success() {
            "v".green()
        } else {
            "x".red()
        };
        self.line(format!(
            "  {} {} {}",
            mark,
            result.tool_name,
            tool_result_preview(result).dimmed()
        ));
    }

    fn on_complete(&self, _outcome: LoopOutcome, _rounds: u32) {
        self.finish();
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl AgentProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: u32, max_rounds: u32) {
        eprintln!("{} Round {}/{}", "->".cyan(), round, max_rounds);
    }

    fn on_completion_retry(&self, attempt: u32, max_retries: u32, error: &str) {
        eprintln!("  retry {}/{}: {}", attempt, max_retries, error);
    }

    fn on_tool_call(&self, call: &ToolCall) {
        eprintln!("  {} {}", call.name, tool_args_preview(call));
    }

    fn on_tool_result(&self, result: &ToolResult) {
        if result.is_success() {
            eprintln!("  {} {}", "v".green(), result.tool_name);
        } else {
            eprintln!(
                "  {} {} ({})",
                "x".red(),
                result.tool_name,
                tool_result_preview(result)
            );
        }
    }
}
