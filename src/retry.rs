//! Retry/backoff wrapper for transient provider failures.
//!
//! Only [`Error::ProviderTransient`] is retried; every other error
//! propagates untouched. The wrapper is the single place retry behavior
//! lives — callers never hand-roll their own loops around provider calls.

use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryOptions {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryOptions {
    /// Delay before the next attempt. A provider wait hint (seconds) bumps
    /// the delay to `hint + 5s`, floored at `base_delay`.
    fn delay_for(&self, estimated_wait_secs: Option<u64>) -> Duration {
        match estimated_wait_secs {
            Some(secs) => self
                .base_delay
                .max(Duration::from_secs(secs) + Duration::from_secs(5)),
            None => self.base_delay,
        }
    }
}

/// Run `operation` up to `options.max_attempts` times, sleeping between
/// transient failures. Exhausting every attempt yields
/// [`Error::ExhaustedRetries`] carrying the last observed status/message.
pub async fn with_retry<T, F, Fut>(options: &RetryOptions, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = options.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(Error::ProviderTransient {
                status,
                message,
                estimated_wait_secs,
            }) => {
                if attempt >= max_attempts {
                    return Err(Error::ExhaustedRetries {
                        attempts: max_attempts,
                        status,
                        message,
                    });
                }

                let delay = options.delay_for(estimated_wait_secs);
                warn!(
                    "Transient provider error (status {}) on attempt {}/{}: {}. Retrying in {:?}",
                    status, attempt, max_attempts, message, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(other) => return Err(other),
        }
    }
}
