//! Retry ceiling and linear backoff for model invocations.

use std::time::Duration;

/// Total attempts per logical invocation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Backoff unit multiplied by the number of the attempt that just failed.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(2);

/// Retry settings for [`InvocationClient`](super::InvocationClient).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never below 1.
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// Delay before the attempt that follows `failed_attempt` (1-based).
    ///
    /// Linear: attempt 1 failing waits one unit, attempt 2 waits two.
    #[must_use]
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(failed_attempt)
    }

    /// Whether another attempt is allowed after `attempt` failed.
    #[must_use]
    pub const fn has_next(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_three_attempts_two_second_unit() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_unit, Duration::from_secs(2));
    }

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(2), Duration::from_secs(4));
        assert_eq!(policy.delay_after(3), Duration::from_secs(6));
    }

    #[test]
    fn ceiling_stops_after_max_attempts() {
        let policy = RetryPolicy::default();
        assert!(policy.has_next(1));
        assert!(policy.has_next(2));
        assert!(!policy.has_next(3));
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
        assert!(!policy.has_next(1));
    }
}
