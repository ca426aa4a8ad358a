//! Conversation store port
//!
//! Abstract ordered-append storage for conversations that span several
//! `process_message` calls.

use async_trait::async_trait;
use taskpilot_domain::{ConversationId, Message};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt conversation '{id}': {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Storage error: {0}")]
    Other(String),
}

/// Ordered message storage keyed by conversation id.
///
/// Callers serialize access per id (see
/// [`SessionLocks`](crate::use_cases::session_locks::SessionLocks)), so
/// implementations only need `append` to be atomic for one batch: after a
/// crash either all of a batch is visible or none of it.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// All messages of a conversation, in append order. Unknown ids yield an
    /// empty list.
    async fn load(&self, id: &ConversationId) -> Result<Vec<Message>, StoreError>;

    /// Append a batch of messages to the end of a conversation.
    async fn append(&self, id: &ConversationId, messages: &[Message]) -> Result<(), StoreError>;
}
