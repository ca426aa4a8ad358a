//! Type definitions for the ProcessMessage use case.

use crate::ports::conversation_store::StoreError;
use taskpilot_domain::{Conversation, ConversationId, DomainError, LoopOutcome};
use thiserror::Error;

/// Errors that abort a run before a reply exists.
///
/// These never leave the use case: they are turned into a
/// [`LoopOutcome::Internal`] output with a degraded reply.
#[derive(Error, Debug)]
pub enum ProcessMessageError {
    #[error("Conversation store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the ProcessMessage use case
#[derive(Debug, Clone)]
pub struct ProcessMessageInput {
    /// The user's message
    pub message: String,
    /// Persisted conversation to continue; `None` runs a single-turn conversation
    pub conversation_id: Option<ConversationId>,
}

impl ProcessMessageInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id: None,
        }
    }

    pub fn in_conversation(mut self, id: ConversationId) -> Self {
        self.conversation_id = Some(id);
        self
    }
}

/// Output from the ProcessMessage use case
#[derive(Debug, Clone)]
pub struct ProcessMessageOutput {
    /// Text for the user: the model's final answer or a degraded explanation
    pub reply: String,
    pub outcome: LoopOutcome,
    /// Completion rounds performed
    pub rounds: u32,
    /// Tool calls dispatched across all rounds
    pub tool_calls: usize,
    /// History after the run, including any earlier turns of a persisted conversation
    pub conversation: Conversation,
}

impl ProcessMessageOutput {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
