//! Poll backoff policy.
//!
//! The verifier's sleep schedule lives behind a small trait so the delay
//! math is testable on its own, without timers.

use std::time::Duration;

/// Computes the wait before the next poll.
pub trait PollBackoff: Send + Sync {
    fn next_delay(&self, attempt: u32) -> Duration;
}

/// Bounded, linearly increasing backoff: `min(cap, base + attempt × increment)`.
#[derive(Debug, Clone)]
pub struct VerifyBackoff {
    /// Delay before the first retry.
    pub base: Duration,
    /// Added per attempt.
    pub increment: Duration,
    /// Upper bound for any single wait.
    pub cap: Duration,
}

impl Default for VerifyBackoff {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            increment: Duration::from_millis(100),
            cap: Duration::from_secs(5),
        }
    }
}

impl PollBackoff for VerifyBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        let grown = self.base + self.increment.saturating_mul(attempt);
        grown.min(self.cap)
    }
}
