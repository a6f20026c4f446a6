//! Retry and pacing arithmetic
//!
//! Pure delay computation, kept separate from the HTTP client so the math
//! can be tested without a network.

use std::time::Duration;

use rand::Rng;

/// Growth factor is clamped to `2^MAX_BACKOFF_SHIFT` (64x the base delay).
const MAX_BACKOFF_SHIFT: u32 = 6;

/// An inclusive sleep interval. Sampling draws a uniformly random duration
/// from `[min, max]`, which is how every pause in the pipeline (pre-request
/// jitter, retry jitter, page and batch pacing) is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseRange {
    pub min: Duration,
    pub max: Duration,
}

impl PauseRange {
    /// A range that always samples to zero (pacing disabled).
    pub const ZERO: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub const fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms),
        }
    }

    /// Draw a random duration from the range.
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
    }
}

/// Retry schedule for one logical request: how many attempts are allowed and
/// how long to wait between them.
///
/// Attempts are counted from 1. The wait before attempt `n + 1` is
/// `base_backoff * 2^(n - 1)` plus a random `retry_jitter` sample, so the
/// schedule for the defaults (10s base) runs 10s, 20s, 40s, ... capped at
/// 64x the base. Rate-limit responses (HTTP 429) and transient failures
/// share the same attempt budget; both end in the retries-exhausted error
/// once `max_attempts` tries have failed.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub retry_jitter: PauseRange,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff: Duration, retry_jitter: PauseRange) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff,
            retry_jitter,
        }
    }

    /// Deterministic exponential component of the wait after `attempt` failed.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT);
        let factor = 1u32 << shift;
        self.base_backoff.saturating_mul(factor)
    }

    /// Full wait after `attempt` failed: exponential component plus jitter.
    pub fn backoff_delay_jittered(&self, attempt: u32) -> Duration {
        self.backoff_delay(attempt) + self.retry_jitter.sample()
    }

    /// True while another attempt is allowed after `attempt` failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
