//! Retry policy for profile requests.

use super::transport::RequestError;
use std::time::Duration;

/// Longest server-requested wait we are willing to sleep through.
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Bounded retry policy used by `GithubClient`.
#[derive(Clone, Copy, Debug)]
pub(super) struct RetryPolicy {
    /// Upper bound on total attempts, including the initial request.
    pub(super) max_attempts: u32,
    /// Base delay used for exponential backoff.
    pub(super) initial_backoff: Duration,
    /// Maximum allowed delay between retry attempts.
    pub(super) max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    pub(super) fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Decide whether another attempt should be scheduled.
    pub(super) fn should_retry(&self, err: &RequestError, attempt: u32) -> bool {
        if attempt.saturating_add(1) >= self.max_attempts {
            return false;
        }
        match err {
            RequestError::Transport(inner) => inner.is_timeout() || inner.is_connect(),
            RequestError::Status {
                code,
                retry_after_secs,
                rate_limited,
                ..
            } => {
                if *rate_limited {
                    // Primary rate-limit windows last up to an hour; only wait
                    // out short, explicit server hints.
                    return retry_after_secs.is_some_and(|secs| secs <= MAX_RETRY_AFTER_SECS);
                }
                (500..=599).contains(code)
            }
            RequestError::Payload(_) => false,
        }
    }

    /// Compute retry delay, respecting server hints when present.
    pub(super) fn retry_delay_for(&self, attempt: u32, err: &RequestError) -> Duration {
        if let Some(seconds) = err.retry_after_secs() {
            return Duration::from_secs(seconds.clamp(1, MAX_RETRY_AFTER_SECS));
        }
        let pow = 2u32.saturating_pow(attempt);
        let millis = self
            .initial_backoff
            .as_millis()
            .saturating_mul(pow as u128)
            .min(self.max_backoff.as_millis());
        Duration::from_millis(millis as u64)
    }
}
