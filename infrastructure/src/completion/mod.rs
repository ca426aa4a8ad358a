//! Completion service adapters

mod openrouter;
mod wire;

pub use openrouter::OpenRouterGateway;
