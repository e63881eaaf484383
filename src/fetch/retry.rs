//! Bounded retry with linear backoff around one logical request.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::config::FetchConfig;
use crate::error::FetchError;

/// Retries one operation up to `max_attempts` times, sleeping
/// `base_delay * attempt` between attempts.
///
/// Linear rather than exponential: the upstream's rate limits are modest
/// and the orchestrator already paces requests, so attempt delays of
/// 2s/4s are enough headroom without stalling a full league fetch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        debug_assert!(max_attempts >= 1);
        Self {
            max_attempts,
            base_delay,
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Drive `op` to success or retry exhaustion.
    ///
    /// Success short-circuits with no trailing delay. After the final
    /// failed attempt the last error is returned inside
    /// [`FetchError::RetryExhausted`].
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(FetchError::RetryExhausted {
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "attempt failed, backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
        )
    }
}
