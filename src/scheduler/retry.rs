//! # Fixed-delay Retry
//!
//! Runs an async operation up to a fixed number of attempts with a fixed
//! pause between them. Every failure is kept together with its attempt
//! number. The loop observes a [`CancellationToken`] before each attempt,
//! while an attempt runs and during every pause.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A failed attempt and its 1-based attempt number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure<E> {
    pub attempt: u32,
    pub error: E,
}

/// Why a retried operation did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every attempt failed
    Exhausted { attempts: Vec<AttemptFailure<E>> },
    /// The token was cancelled before the attempt budget was used up
    Cancelled { attempts: Vec<AttemptFailure<E>> },
}

impl<E> RetryError<E> {
    /// Failures recorded so far, in attempt order
    pub fn attempts(&self) -> &[AttemptFailure<E>] {
        match self {
            Self::Exhausted { attempts } | Self::Cancelled { attempts } => attempts,
        }
    }

    pub fn last_error(&self) -> Option<&E> {
        self.attempts().last().map(|failure| &failure.error)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { attempts } => {
                write!(f, "all {} attempts failed", attempts.len())?;
            }
            Self::Cancelled { attempts } => {
                write!(f, "cancelled after {} failed attempt(s)", attempts.len())?;
            }
        }
        for failure in self.attempts() {
            write!(f, "; #{}: {}", failure.attempt, failure.error)?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

/// Result of a successful retried operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retried<T> {
    pub value: T,
    /// Attempt that succeeded (1-based)
    pub attempts: u32,
}

/// Fixed attempt count with a fixed delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(5))
    }
}

impl RetryPolicy {
    /// At least one attempt is always made
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `operation` until it succeeds, the budget is spent or `cancel` fires
    ///
    /// `operation` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<Retried<T>, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut failures: Vec<AttemptFailure<E>> = Vec::new();

        for attempt in 1..=self.attempts {
            if cancel.is_cancelled() {
                return Err(RetryError::Cancelled { attempts: failures });
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = operation(attempt) => Some(result),
            };
            let Some(result) = result else {
                debug!(attempt, "attempt aborted by cancellation");
                return Err(RetryError::Cancelled { attempts: failures });
            };

            match result {
                Ok(value) => {
                    return Ok(Retried {
                        value,
                        attempts: attempt,
                    })
                }
                Err(error) => {
                    warn!(
                        attempt,
                        max_attempts = self.attempts,
                        error = %error,
                        "attempt failed"
                    );
                    failures.push(AttemptFailure { attempt, error });
                }
            }

            if attempt < self.attempts {
                let cancelled = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => true,
                    _ = tokio::time::sleep(self.delay) => false,
                };
                if cancelled {
                    debug!(attempt, "retry delay aborted by cancellation");
                    return Err(RetryError::Cancelled { attempts: failures });
                }
            }
        }

        Err(RetryError::Exhausted { attempts: failures })
    }
}
