//! ABOUTME: Pure attempt-to-delay backoff function and a retry wrapper built on it
//! ABOUTME: Not a job-scheduling primitive itself; composes around any fallible closure

use schedkit_core::Result;
use std::time::Duration;

/// Maps an attempt index (0-based) to a delay: `initial * factor^attempt`,
/// capped at `max_delay` when set.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub factor: f64,
    pub max_delay: Option<Duration>,
}

impl BackoffPolicy {
    pub fn new(initial: Duration, factor: f64) -> Self {
        Self {
            initial,
            factor,
            max_delay: None,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// The delay before attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let secs = self.initial.as_secs_f64() * self.factor.powi(attempt as i32);
        let delay = Duration::from_secs_f64(secs.max(0.0));
        match self.max_delay {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }
}

/// Retries `body` up to `max_retries` additional times beyond the first
/// attempt, sleeping by `policy.delay_for` between failed attempts.
/// `max_retries = 0` means exactly one attempt, no retry. Re-raises the
/// last failure once the retry budget is exhausted.
pub async fn with_retries<F, Fut, T>(policy: &BackoffPolicy, max_retries: u32, mut body: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match body().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= max_retries {
                    return Err(e);
                }
                tokio::time::sleep(policy.delay_for(attempt)).await;
                attempt += 1;
            }
        }
    }
}
