//! Retry policy for network calls.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded exponential backoff.
///
/// Attempt `n` (0-indexed retry number) waits `min(base_delay * 2^n, max_delay)`.
/// The total number of attempts is `max_retries + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// Policy for the completion service: 3 retries, 500 ms doubling up to 8 s.
    pub fn completion_default() -> Self {
        Self::new(3, Duration::from_millis(500), Duration::from_secs(8))
    }

    /// Policy for the tool endpoint: 2 retries, 250 ms doubling up to 2 s.
    pub fn tool_default() -> Self {
        Self::new(2, Duration::from_millis(250), Duration::from_secs(2))
    }

    /// No retries at all
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(exp).min(self.max_delay)
    }
}
