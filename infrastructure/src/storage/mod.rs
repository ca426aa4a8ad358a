//! Conversation store adapters

mod jsonl;
mod memory;

pub use jsonl::JsonlConversationStore;
pub use memory::InMemoryConversationStore;
