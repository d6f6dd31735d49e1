//! Bounded retry with exponential backoff around a single network call.

use crate::core::domain::error::{ProxmoxError, ProxmoxResult};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How often and how patiently a transport failure is retried.
///
/// The delay before retry `n` (counting from 1) is
/// `min(base_delay * 2^(n-1), max_delay)`. Only [`ProxmoxError::Transport`]
/// is retried; every other error is returned as-is on the first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, the first one included. Never below 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Returns the pause taken before the given retry (1 = first retry).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Runs `op` until it succeeds, fails with a non-transport error, or the
    /// attempt budget is spent.
    ///
    /// # Errors
    /// Returns the first non-transport error unchanged, or
    /// [`ProxmoxError::HostUnavailable`] once every attempt failed at the
    /// transport level.
    pub async fn run<T, F, Fut>(&self, host: &str, mut op: F) -> ProxmoxResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ProxmoxResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transport() => {
                    if attempt >= max_attempts {
                        return Err(ProxmoxError::HostUnavailable {
                            host: host.to_string(),
                            attempts: attempt,
                            reason: err.to_string(),
                        });
                    }
                    let delay = self.delay_for(attempt);
                    warn!(
                        host,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transport failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
