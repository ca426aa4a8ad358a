//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface for taskpilot.

mod repl;

pub use repl::ChatRepl;
