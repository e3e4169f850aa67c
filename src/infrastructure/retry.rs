//! Bounded retry with a pluggable backoff schedule.
//!
//! The policy knows nothing about HTTP: the caller supplies the operation
//! and a predicate deciding which errors deserve another attempt.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::models::RetryConfig;

/// Delay schedule; attempts are numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// No delay at all
    None,
    /// The same delay before every attempt
    Fixed(Duration),
    /// `step * attempt` before attempt `attempt`
    Linear { step: Duration },
}

impl Backoff {
    /// Delay to apply before `attempt`
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(delay) => *delay,
            Self::Linear { step } => step.saturating_mul(attempt),
        }
    }
}

/// Why an operation ultimately failed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The predicate rejected the error; no further attempts were made
    #[error("attempt {attempt} failed permanently: {error}")]
    Permanent { attempt: u32, error: E },

    /// Every allowed attempt failed with a retryable error
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Permanent { attempt, .. } => *attempt,
            Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// The error returned by the final attempt
    pub fn into_inner(self) -> E {
        match self {
            Self::Permanent { error, .. } => error,
            Self::Exhausted { last, .. } => last,
        }
    }
}

/// Retry policy: attempt limit plus backoff schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
    delay_first_attempt: bool,
}

impl RetryPolicy {
    /// Create a policy that also waits before the first attempt
    ///
    /// # Panics
    /// Panics if `max_attempts` is 0
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        assert!(max_attempts > 0, "max_attempts must be greater than 0");
        Self {
            max_attempts,
            backoff,
            delay_first_attempt: true,
        }
    }

    /// Build from validated configuration
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts.max(1),
            Backoff::Linear {
                step: Duration::from_millis(config.backoff_step_ms),
            },
        )
        .with_first_attempt_delay(config.delay_first_attempt)
    }

    /// Toggle the delay before attempt 1
    #[must_use]
    pub const fn with_first_attempt_delay(mut self, enabled: bool) -> Self {
        self.delay_first_attempt = enabled;
        self
    }

    /// Same schedule with a different attempt limit (minimum 1)
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Delay applied before `attempt` under this policy
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 && !self.delay_first_attempt {
            return Duration::ZERO;
        }
        self.backoff.delay(attempt)
    }

    /// Run `operation` until it succeeds, fails permanently or runs out of
    /// attempts. The operation receives the 1-based attempt number.
    pub async fn execute<F, Fut, T, E, P>(
        &self,
        operation: F,
        is_retryable: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        self.execute_observed(operation, is_retryable, |_, _| {})
            .await
    }

    /// Like [`execute`](Self::execute), calling `on_retryable` with the
    /// attempt number and error after every retryable failure, including the
    /// one that exhausts the policy
    pub async fn execute_observed<F, Fut, T, E, P, O>(
        &self,
        mut operation: F,
        is_retryable: P,
        mut on_retryable: O,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        O: FnMut(u32, &E),
    {
        let mut attempt = 1;

        loop {
            let delay = self.delay_before(attempt);
            if !delay.is_zero() {
                debug!(attempt, delay_ms = delay.as_millis() as u64, "waiting before attempt");
                sleep(delay).await;
            }

            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(err) if is_retryable(&err) => {
                    on_retryable(attempt, &err);
                    if attempt >= self.max_attempts {
                        warn!(attempts = attempt, "retry attempts exhausted");
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last: err,
                        });
                    }
                    debug!(attempt, max_attempts = self.max_attempts, "retryable failure");
                    attempt += 1;
                }
                Err(err) => {
                    debug!(attempt, "permanent failure, not retrying");
                    return Err(RetryError::Permanent {
                        attempt,
                        error: err,
                    });
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    /// Three attempts, 4 s linear step, first attempt delayed
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TestError {
        Transient,
        Fatal,
    }

    fn is_transient(err: &TestError) -> bool {
        *err == TestError::Transient
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Backoff::None)
    }

    #[test]
    fn test_linear_backoff() {
        let backoff = Backoff::Linear {
            step: Duration::from_secs(4),
        };
        assert_eq!(backoff.delay(1), Duration::from_secs(4));
        assert_eq!(backoff.delay(2), Duration::from_secs(8));
        assert_eq!(backoff.delay(3), Duration::from_secs(12));
    }

    #[test]
    fn test_fixed_and_none_backoff() {
        assert_eq!(
            Backoff::Fixed(Duration::from_millis(5)).delay(9),
            Duration::from_millis(5)
        );
        assert_eq!(Backoff::None.delay(3), Duration::ZERO);
    }

    #[test]
    fn test_first_attempt_delay_toggle() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(1), Duration::from_secs(4));
        assert_eq!(policy.delay_before(2), Duration::from_secs(8));

        let eager = policy.with_first_attempt_delay(false);
        assert_eq!(eager.delay_before(1), Duration::ZERO);
        assert_eq!(eager.delay_before(2), Duration::from_secs(8));
    }

    #[test]
    fn test_from_config() {
        let policy = RetryPolicy::from_config(&RetryConfig {
            max_attempts: 5,
            backoff_step_ms: 100,
            delay_first_attempt: false,
        });
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(
            policy.backoff(),
            Backoff::Linear {
                step: Duration::from_millis(100)
            }
        );
        assert_eq!(policy.delay_before(1), Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "max_attempts must be greater than 0")]
    fn test_zero_attempts_rejected() {
        let _ = RetryPolicy::new(0, Backoff::None);
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = fast_policy(3)
            .execute(
                |_| {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, TestError>(42)
                    }
                },
                is_transient,
            )
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = fast_policy(3)
            .execute(
                |attempt| {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        if attempt < 3 {
                            Err(TestError::Transient)
                        } else {
                            Ok(attempt)
                        }
                    }
                },
                is_transient,
            )
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_stops_immediately() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = fast_policy(3)
            .execute(
                |_| {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err(TestError::Fatal)
                    }
                },
                is_transient,
            )
            .await;

        assert_eq!(
            result,
            Err(RetryError::Permanent {
                attempt: 1,
                error: TestError::Fatal
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut observed = Vec::new();

        let result: Result<(), _> = fast_policy(3)
            .execute_observed(
                |_| {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err(TestError::Transient)
                    }
                },
                is_transient,
                |attempt, _| observed.push(attempt),
            )
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts(), 3);
        assert_eq!(err.into_inner(), TestError::Transient);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(observed, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_linear_delays_are_applied() {
        let policy = RetryPolicy::new(
            3,
            Backoff::Linear {
                step: Duration::from_secs(4),
            },
        );
        let start = tokio::time::Instant::now();

        let result: Result<(), _> = policy
            .execute(|_| async { Err(TestError::Transient) }, is_transient)
            .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 3, .. })));
        // 4 + 8 + 12 seconds, front-loaded on the first attempt
        assert!(start.elapsed() >= Duration::from_secs(24));
    }
}
