//! Reconnect backoff

use std::time::Duration;

/// Delay bounds for reconnect attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub max: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(2),
            max: Duration::from_secs(30),
        }
    }
}

/// Exponential backoff: `initial`, doubling per consecutive failure, capped at `max`
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: BackoffPolicy,
    attempts: u32,
}

impl Backoff {
    #[must_use]
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    /// Delay before the next attempt; advances the failure count
    pub fn next_delay(&mut self) -> Duration {
        let factor = 2u32.saturating_pow(self.attempts);
        self.attempts = self.attempts.saturating_add(1);
        self.policy
            .initial
            .saturating_mul(factor)
            .min(self.policy.max)
    }

    /// Forget earlier failures after a successful connection
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Consecutive failures so far
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
