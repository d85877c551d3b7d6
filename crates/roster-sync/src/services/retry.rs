//! Bounded exponential retry for external calls

use std::future::Future;
use std::time::Duration;

use roster_common::SyncConfig;
use roster_core::GatewayResult;
use tracing::{debug, warn};

use super::error::SyncError;

/// Retry schedule: `initial_delay * 2^n` before retry `n`, at most `max_retries` retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_retries: 3,
        }
    }
}

impl From<&SyncConfig> for RetryPolicy {
    fn from(config: &SyncConfig) -> Self {
        Self {
            initial_delay: config.retry_initial_delay(),
            max_retries: config.retry_max_retries,
        }
    }
}

impl RetryPolicy {
    /// Same attempt count, no waiting
    pub fn immediate() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Total attempts including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor)
    }

    /// Run an external call, retrying transient failures
    ///
    /// Permanent failures return immediately. A rate limit asking for a
    /// longer wait than the schedule wins for that step.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T, SyncError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GatewayResult<T>>,
    {
        let mut retry = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && retry < self.max_retries => {
                    let mut delay = self.delay_for(retry);
                    if let Some(ms) = e.retry_after_ms() {
                        delay = delay.max(Duration::from_millis(ms));
                    }
                    debug!(
                        operation,
                        attempt = retry + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "External call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(e) => {
                    if retry > 0 {
                        warn!(operation, attempts = retry + 1, error = %e, "Retries exhausted");
                    }
                    return Err(SyncError::gateway(operation, e));
                }
            }
        }
    }
}
