//! Ordered message history with turn-order invariants.

use super::entities::{Message, Role};
use crate::core::error::DomainError;
use std::collections::HashSet;

/// Ordered sequence of messages forming the model's context.
///
/// Appends are checked so the history can never be in a shape the
/// completion service would reject:
///
/// - at most one system message, and only as the first message
/// - a tool message must answer a call id issued by the latest tool request
///   that has not been answered yet
/// - no user or assistant message while tool calls are still unanswered
/// - call ids within one tool request are unique
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
        }
    }

    /// Rebuild a conversation from stored messages, re-checking every invariant.
    pub fn from_messages(messages: Vec<Message>) -> Result<Self, DomainError> {
        let mut conversation = Self::new();
        conversation.extend(messages)?;
        Ok(conversation)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn has_system_prompt(&self) -> bool {
        self.messages
            .first()
            .is_some_and(|m| m.role == Role::System)
    }

    /// Call ids from the latest tool request that have no answer yet.
    pub fn pending_tool_calls(&self) -> Vec<&str> {
        let Some(request_idx) = self.messages.iter().rposition(Message::is_tool_request) else {
            return Vec::new();
        };

        let answered: HashSet<&str> = self.messages[request_idx + 1..]
            .iter()
            .filter_map(|m| m.tool_call_id.as_deref())
            .collect();

        self.messages[request_idx]
            .tool_calls
            .iter()
            .map(|c| c.id.as_str())
            .filter(|id| !answered.contains(id))
            .collect()
    }

    pub fn append(&mut self, message: Message) -> Result<(), DomainError> {
        self.check(&message)?;
        self.messages.push(message);
        Ok(())
    }

    /// Append a batch atomically: either every message is appended or none is.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = Message>) -> Result<(), DomainError> {
        let mut staged = self.clone();
        for message in batch {
            staged.append(message)?;
        }
        *self = staged;
        Ok(())
    }

    fn check(&self, message: &Message) -> Result<(), DomainError> {
        let pending = self.pending_tool_calls();

        match message.role {
            Role::System if !self.messages.is_empty() => Err(invalid(
                "system message is only allowed as the first message",
            )),
            Role::Tool => {
                let id = message
                    .tool_call_id
                    .as_deref()
                    .ok_or_else(|| invalid("tool message without tool_call_id"))?;
                if pending.contains(&id) {
                    Ok(())
                } else {
                    Err(invalid(format!(
                        "tool message '{}' does not answer a pending tool call",
                        id
                    )))
                }
            }
            _ if !pending.is_empty() => Err(invalid(format!(
                "{} message while tool calls are unanswered: {}",
                message.role,
                pending.join(", ")
            ))),
            Role::Assistant if message.is_tool_request() => {
                let mut seen = HashSet::new();
                match message.tool_calls.iter().find(|c| !seen.insert(c.id.as_str())) {
                    Some(dup) => Err(invalid(format!("duplicate tool call id '{}'", dup.id))),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }
}

fn invalid(reason: impl Into<String>) -> DomainError {
    DomainError::InvalidConversation(reason.into())
}
