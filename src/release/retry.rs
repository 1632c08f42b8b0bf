//! Retry logic with truncated exponential backoff and jitter.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Attempt budget and delay cap for a retried operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(4, Duration::from_millis(4000))
    }
}

impl RetryPolicy {
    /// Policy allowing `attempts` tries (at least one) with sleeps capped at `max_delay`
    pub fn new(attempts: u32, max_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            max_delay,
        }
    }

    /// Total attempts, first try included
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Cap on a single sleep
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Sleep after the zero-indexed `attempt` failed.
    ///
    /// `min(max_delay, round((2^attempt + jitter) * 1000 ms))`, `jitter` in `[0, 1)`.
    pub fn delay(&self, attempt: u32, jitter: f64) -> Duration {
        let exponent = i32::try_from(attempt.min(32)).unwrap_or(32);
        let millis = ((2f64.powi(exponent) + jitter) * 1000.0).round();
        Duration::from_millis(millis as u64).min(self.max_delay)
    }
}

/// All attempts failed
#[derive(Debug)]
pub struct RetryError<E> {
    /// Attempts made
    pub attempts: u32,
    /// Error of the final attempt
    pub last: E,
}

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// The closure receives the zero-indexed attempt number. Sleeps happen only
/// between attempts, never after the last one. The caller decides what to do
/// with a [`RetryError`].
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    log::info!("{} succeeded after {} retry(ies)", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(e) => {
                let made = attempt + 1;
                if made >= policy.attempts {
                    log::error!("{} failed after {} attempt(s): {}", operation_name, made, e);
                    return Err(RetryError {
                        attempts: made,
                        last: e,
                    });
                }

                let wait = policy.delay(attempt, rand::random::<f64>());
                log::warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:.1}s",
                    operation_name,
                    made,
                    policy.attempts,
                    e,
                    wait.as_secs_f64()
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
        }
    }
}
