use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Fixed-ceiling, fixed-delay retry policy.
///
/// External scraping and extraction services fail transiently often enough
/// that every remote call goes through this driver instead of an ad-hoc loop
/// at each call site. There is deliberately no exponential backoff: the
/// remote side rate-limits on its own and a fixed short pause recovers the
/// common anti-bot hiccups.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

/// Context handed to each attempt so the caller can vary the request shape
/// (switch proxy mode, degrade to a minimal configuration on the last try).
#[derive(Debug, Clone, Copy)]
pub struct Attempt {
    /// 1-based attempt number
    pub number: u32,
    /// True on the final attempt before giving up
    pub is_last: bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Run `attempt_fn` up to `max_attempts` times, sleeping `delay` between
    /// failures. Returns the first success or the last error.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut attempt_fn: F) -> Result<T, E>
    where
        F: FnMut(Attempt) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut number = 1;

        loop {
            let attempt = Attempt {
                number,
                is_last: number >= self.max_attempts,
            };

            tracing::debug!(
                operation = %operation,
                attempt = number,
                max_attempts = self.max_attempts,
                "attempt start"
            );

            match attempt_fn(attempt).await {
                Ok(value) => {
                    if number > 1 {
                        tracing::info!(
                            operation = %operation,
                            attempt = number,
                            "succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(
                        operation = %operation,
                        attempt = number,
                        error = %e,
                        "attempt failed"
                    );

                    if attempt.is_last {
                        return Err(e);
                    }
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    number += 1;
                }
            }
        }
    }
}
