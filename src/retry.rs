//! Retry configuration, delay calculation, and the shared backoff helper.
//!
//! Provides [`RetryConfig`] for controlling retry behaviour and
//! [`with_retry()`] for wrapping any request-producing async operation
//! with bounded exponential backoff.
//!
//! Retry limits are chosen per call site rather than baked into the
//! client: page listings get a couple of retries, per-item detail
//! fetches inside a bulk load get fewer to bound worst-case page load
//! latency, and background prefetch gets a single retry.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::telemetry;
use crate::{DexError, Result};

/// Configuration for retry behaviour on failed requests.
///
/// Uses exponential backoff without jitter. Client-error status codes
/// (which will not succeed on a retry) are excluded up front:
///
/// ```rust
/// # use rotomdex::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_retries(2)
///     .initial_delay(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    /// 0 = single attempt. Default: 3.
    pub max_retries: u32,
    /// Base delay before the first retry. Default: 1s.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 10s.
    pub max_delay: Duration,
    /// Status codes that are never retried. Default: 400, 401, 403, 404.
    pub exclude_status: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            exclude_status: vec![400, 401, 403, 404],
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set the maximum number of retries after the initial attempt.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Replace the set of status codes that are never retried.
    pub fn exclude_status(mut self, codes: Vec<u16>) -> Self {
        self.exclude_status = codes;
        self
    }

    /// Calculate the delay before a given retry attempt (1-indexed).
    ///
    /// Uses exponential backoff: `initial_delay * 2^(attempt-1)`, capped
    /// at `max_delay`. No jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let delay = self.initial_delay.saturating_mul(2u32.saturating_pow(exp));
        delay.min(self.max_delay)
    }

    /// Whether an error's status code rules out a retry.
    fn is_excluded(&self, err: &DexError) -> bool {
        err.status()
            .is_some_and(|status| self.exclude_status.contains(&status))
    }
}

/// Execute an async operation with retry logic.
///
/// Errors carrying a status code in `config.exclude_status` are returned
/// immediately. Everything else is retried up to `config.max_retries`
/// times with exponential backoff, for at most `max_retries + 1` total
/// attempts.
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, operation: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1u32;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if config.is_excluded(&e) => return Err(e),
            Err(e) => {
                if attempt > config.max_retries {
                    return Err(e);
                }
                let delay = config.delay_for_attempt(attempt);
                metrics::counter!(telemetry::RETRIES_TOTAL, "operation" => operation.to_owned())
                    .increment(1);
                warn!(
                    operation,
                    attempt,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_per_attempt() {
        let config = RetryConfig::new();
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(4000));
    }

    #[test]
    fn delay_caps_at_max() {
        let config = RetryConfig::new();
        assert_eq!(config.delay_for_attempt(5), Duration::from_millis(10_000));
        assert_eq!(config.delay_for_attempt(31), Duration::from_millis(10_000));
    }

    #[test]
    fn excluded_status_detection() {
        let config = RetryConfig::new();
        assert!(config.is_excluded(&DexError::NotFound("x".into())));
        assert!(config.is_excluded(&DexError::Api {
            status: 400,
            message: "bad request".into()
        }));
        assert!(!config.is_excluded(&DexError::Api {
            status: 503,
            message: "unavailable".into()
        }));
        assert!(!config.is_excluded(&DexError::Http("timeout".into())));
    }

    #[test]
    fn config_builder_pattern() {
        let config = RetryConfig::new()
            .max_retries(5)
            .initial_delay(Duration::from_millis(50))
            .max_delay(Duration::from_millis(200))
            .exclude_status(vec![404]);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.initial_delay, Duration::from_millis(50));
        assert_eq!(config.max_delay, Duration::from_millis(200));
        assert_eq!(config.exclude_status, vec![404]);
    }

    #[test]
    fn disabled_config_single_attempt() {
        assert_eq!(RetryConfig::disabled().max_retries, 0);
    }
}
