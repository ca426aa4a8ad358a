//! Conversation domain
//!
//! Messages, the ordered history handed to the completion service, and the
//! two possible shapes of a completion response.

pub mod entities;
pub mod history;
pub mod response;

pub use entities::{ConversationId, Message, Role};
pub use history::Conversation;
pub use response::CompletionResult;
