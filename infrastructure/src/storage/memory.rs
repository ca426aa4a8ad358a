//! Process-local conversation store.

use async_trait::async_trait;
use std::collections::HashMap;
use taskpilot_application::{ConversationStore, StoreError};
use taskpilot_domain::{ConversationId, Message};
use tokio::sync::RwLock;

/// Conversations kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<ConversationId, Vec<Message>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with at least one message
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn load(&self, id: &ConversationId) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .conversations
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, id: &ConversationId, messages: &[Message]) -> Result<(), StoreError> {
        if messages.is_empty() {
            return Ok(());
        }
        self.conversations
            .write()
            .await
            .entry(id.clone())
            .or_default()
            .extend_from_slice(messages);
        Ok(())
    }
}
