//! Application-level configuration.
//!
//! - [`ExecutionParams`]: agent loop control (round cap, retries, timeouts, acting user)
//! - [`RetryPolicy`]: bounded exponential backoff shared by both network ports

pub mod execution_params;
pub mod retry;

pub use execution_params::ExecutionParams;
pub use retry::RetryPolicy;
