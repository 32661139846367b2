//! # Fixed-Interval Retry
//!
//! Remote services with eventually-consistent dependencies (an IAM role that is still
//! propagating, say) reject requests for a bounded window. [`RetryPolicy`] retries an
//! operation while its error is classified as transient, sleeping a fixed interval
//! between attempts, and gives up after `max_attempts`.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default attempt ceiling for transient failures.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Default pause between attempts.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

/// Attempt ceiling and wait interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            wait: DEFAULT_WAIT,
        }
    }
}

/// Why a retried operation gave up.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RetryError<E> {
    /// Every attempt failed with a transient error.
    #[error("gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },
    /// A non-transient error; returned on the attempt it happened.
    #[error(transparent)]
    Fatal(E),
}

impl RetryPolicy {
    /// A ceiling of 0 is raised to 1: the operation always runs at least once.
    pub fn new(max_attempts: u32, wait: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            wait,
        }
    }

    /// Calls `op` until it succeeds, fails with an error `is_transient` rejects, or
    /// `max_attempts` calls (at least one) have failed transiently.
    pub async fn retry_while<T, E, F, Fut, P>(
        &self,
        mut op: F,
        is_transient: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if is_transient(&e) => {
                    warn!(attempt, max_attempts, error = %e, "Transient failure");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.wait).await;
                    }
                }
                Err(e) => return Err(RetryError::Fatal(e)),
            }
        }

        Err(RetryError::Exhausted {
            attempts: max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    enum Failure {
        NotYet,
        Broken,
    }

    impl std::fmt::Display for Failure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_exhausts_at_ceiling() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = policy(100)
            .retry_while(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Failure::NotYet)
                },
                |e| *e == Failure::NotYet,
            )
            .await;

        assert_eq!(result, Err(RetryError::Exhausted { attempts: 100 }));
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[tokio::test]
    async fn test_fatal_error_is_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = policy(100)
            .retry_while(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Failure::Broken)
                },
                |e| *e == Failure::NotYet,
            )
            .await;

        assert_eq!(result, Err(RetryError::Fatal(Failure::Broken)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = policy(5)
            .retry_while(
                move || async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 {
                        Err(Failure::NotYet)
                    } else {
                        Ok(n)
                    }
                },
                |e| *e == Failure::NotYet,
            )
            .await;

        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn test_zero_ceiling_still_attempts_once() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);

        // Deserialized or hand-built policies can still carry a zero.
        let unchecked = RetryPolicy {
            max_attempts: 0,
            wait: Duration::ZERO,
        };
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = unchecked
            .retry_while(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Failure::NotYet)
                },
                |e| *e == Failure::NotYet,
            )
            .await;

        assert_eq!(result, Err(RetryError::Exhausted { attempts: 1 }));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
