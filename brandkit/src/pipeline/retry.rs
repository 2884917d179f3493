//! Bounded retry with backoff for stage generation calls.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff curve between retry attempts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "strategy", content = "base_ms")]
pub enum Backoff {
    /// Constant delay.
    Constant(u64),
    /// Delay grows linearly with the attempt number.
    Linear(u64),
    /// Delay doubles each attempt.
    Exponential(u64),
}

impl Backoff {
    /// Base delay before jitter for a given attempt (1-based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Constant(ms) => Duration::from_millis(*ms),
            Self::Linear(ms) => Duration::from_millis(ms * u64::from(attempt)),
            Self::Exponential(ms) => {
                Duration::from_millis(ms.saturating_mul(1 << attempt.saturating_sub(1).min(16)))
            }
        }
    }
}

/// Bounded-attempt retry policy for a stage's generation call.
///
/// A stage is attempted up to `max_attempts` times with the same context;
/// only retryable failures are reattempted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first (minimum 1).
    pub max_attempts: u32,
    /// Delay curve between attempts.
    pub backoff: Backoff,
    /// Full jitter: the actual delay is uniform in [0, backoff].
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Exponential(200),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::Constant(0),
            jitter: false,
        }
    }

    /// Fixed delay between a bounded number of attempts.
    #[must_use]
    pub fn constant(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Constant(delay_ms),
            jitter: false,
        }
    }

    /// Exponential backoff with full jitter.
    #[must_use]
    pub fn exponential(max_attempts: u32, base_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Exponential(base_ms),
            jitter: true,
        }
    }

    /// The delay to sleep after a failed attempt (1-based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let base = self.backoff.delay(attempt);
        if !self.jitter {
            return base;
        }
        let millis = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
        if millis == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=millis))
    }
}
