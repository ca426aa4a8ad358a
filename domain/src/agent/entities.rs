//! Agent loop state machine

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Current phase of one `process_message` run
///
/// ```text
/// Init ─▶ AwaitingCompletion ─┬─▶ Done
///              ▲              └─▶ AwaitingToolResults ─┐
///              └───────────────────────────────────────┘
/// any non-terminal phase ─▶ Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    /// User message not yet appended
    #[default]
    Init,
    /// Waiting on the completion service
    AwaitingCompletion,
    /// Dispatching the tool calls of the current round
    AwaitingToolResults,
    /// Final answer produced
    Done,
    /// Terminated without a model answer (round cap, completion failure, cancellation)
    Error,
}

impl AgentPhase {
    pub fn as_str(&self) -> &str {
        match self {
            AgentPhase::Init => "init",
            AgentPhase::AwaitingCompletion => "awaiting_completion",
            AgentPhase::AwaitingToolResults => "awaiting_tool_results",
            AgentPhase::Done => "done",
            AgentPhase::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentPhase::Done | AgentPhase::Error)
    }

    pub fn can_transition_to(&self, next: AgentPhase) -> bool {
        use AgentPhase::*;
        match (*self, next) {
            (Init, AwaitingCompletion) => true,
            (AwaitingCompletion, Done | AwaitingToolResults) => true,
            (AwaitingToolResults, AwaitingCompletion) => true,
            (from, Error) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopOutcome {
    /// The model produced a final answer
    Completed,
    /// The round cap was reached while the model kept requesting tools
    LoopExceeded,
    /// The completion service failed (authentication, or retries exhausted)
    CompletionFailed,
    /// The caller cancelled between rounds
    Cancelled,
    /// Conversation storage failed or stored history was unusable
    Internal,
}

impl LoopOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            LoopOutcome::Completed => "completed",
            LoopOutcome::LoopExceeded => "loop_exceeded",
            LoopOutcome::CompletionFailed => "completion_failed",
            LoopOutcome::Cancelled => "cancelled",
            LoopOutcome::Internal => "internal",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoopOutcome::Completed)
    }

    /// Terminal phase corresponding to this outcome.
    pub fn phase(&self) -> AgentPhase {
        if self.is_success() {
            AgentPhase::Done
        } else {
            AgentPhase::Error
        }
    }
}

impl std::fmt::Display for LoopOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bookkeeping for a single agent loop run.
///
/// Owns the phase and the round counter that backs the iteration guard.
/// A round is one completion call; [`start_round`](Self::start_round) refuses
/// to start a round past `max_rounds`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopRun {
    phase: AgentPhase,
    rounds: u32,
    max_rounds: u32,
    tool_calls: usize,
}

impl LoopRun {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            phase: AgentPhase::Init,
            rounds: 0,
            max_rounds,
            tool_calls: 0,
        }
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn tool_calls(&self) -> usize {
        self.tool_calls
    }

    /// Whether another completion round fits under the cap.
    pub fn has_rounds_left(&self) -> bool {
        self.rounds < self.max_rounds
    }

    /// Enter `AwaitingCompletion` and return the 1-based round number.
    pub fn start_round(&mut self) -> Result<u32, DomainError> {
        if !self.has_rounds_left() {
            return Err(DomainError::InvalidTransition {
                from: self.phase.to_string(),
                to: format!("round {} of {}", self.rounds + 1, self.max_rounds),
            });
        }
        self.transition(AgentPhase::AwaitingCompletion)?;
        self.rounds += 1;
        Ok(self.rounds)
    }

    /// Enter `AwaitingToolResults` for a round requesting `count` calls.
    pub fn tools_requested(&mut self, count: usize) -> Result<(), DomainError> {
        self.transition(AgentPhase::AwaitingToolResults)?;
        self.tool_calls += count;
        Ok(())
    }

    /// Move to the terminal phase matching `outcome`.
    pub fn finish(&mut self, outcome: LoopOutcome) -> Result<(), DomainError> {
        self.transition(outcome.phase())
    }

    fn transition(&mut self, next: AgentPhase) -> Result<(), DomainError> {
        if !self.phase.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }
        self.phase = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_round_completion() {
        let mut run = LoopRun::new(8);
        assert_eq!(run.start_round().unwrap(), 1);
        run.finish(LoopOutcome::Completed).unwrap();

        assert_eq!(run.phase(), AgentPhase::Done);
        assert_eq!(run.rounds(), 1);
        assert_eq!(run.tool_calls(), 0);
    }

    #[test]
    fn test_tool_round_then_completion() {
        let mut run = LoopRun::new(8);
        run.start_round().unwrap();
        run.tools_requested(3).unwrap();
        assert_eq!(run.phase(), AgentPhase::AwaitingToolResults);
        assert_eq!(run.start_round().unwrap(), 2);
        run.finish(LoopOutcome::Completed).unwrap();

        assert_eq!(run.tool_calls(), 3);
    }

    #[test]
    fn test_round_cap_enforced() {
        let mut run = LoopRun::new(2);
        run.start_round().unwrap();
        run.tools_requested(1).unwrap();
        run.start_round().unwrap();
        run.tools_requested(1).unwrap();

        assert!(!run.has_rounds_left());
        assert!(matches!(
            run.start_round(),
            Err(DomainError::InvalidTransition { .. })
        ));
        run.finish(LoopOutcome::LoopExceeded).unwrap();
        assert_eq!(run.phase(), AgentPhase::Error);
    }

    #[test]
    fn test_terminal_phases_are_final() {
        let mut run = LoopRun::new(4);
        run.start_round().unwrap();
        run.finish(LoopOutcome::Completed).unwrap();

        assert!(run.finish(LoopOutcome::Cancelled).is_err());
        assert!(run.start_round().is_err());
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!AgentPhase::Init.can_transition_to(AgentPhase::Done));
        assert!(!AgentPhase::Init.can_transition_to(AgentPhase::AwaitingToolResults));
        assert!(!AgentPhase::AwaitingToolResults.can_transition_to(AgentPhase::Done));
        assert!(AgentPhase::Init.can_transition_to(AgentPhase::Error));
        assert!(!AgentPhase::Done.can_transition_to(AgentPhase::Error));
    }

    #[test]
    fn test_outcome_phase_mapping() {
        assert_eq!(LoopOutcome::Completed.phase(), AgentPhase::Done);
        assert_eq!(LoopOutcome::LoopExceeded.phase(), AgentPhase::Error);
        assert_eq!(LoopOutcome::Cancelled.phase(), AgentPhase::Error);
        assert!(!LoopOutcome::CompletionFailed.is_success());
    }
}
