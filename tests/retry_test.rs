use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use rotomdex::{DexError, RetryConfig, with_retry};

fn transient() -> DexError {
    DexError::Api {
        status: 503,
        message: "unavailable".into(),
    }
}

/// Run `f` through with_retry, counting attempts.
async fn run_counted(
    config: &RetryConfig,
    fail_first: u32,
    fail_with: fn() -> DexError,
) -> (rotomdex::Result<u32>, u32) {
    let calls = AtomicU32::new(0);
    let result = with_retry(config, "test", || {
        let attempt = calls.fetch_add(1, Ordering::Relaxed);
        async move {
            if attempt < fail_first {
                Err(fail_with())
            } else {
                Ok(attempt)
            }
        }
    })
    .await;
    let total = calls.load(Ordering::Relaxed);
    (result, total)
}

fn fast(max_retries: u32) -> RetryConfig {
    RetryConfig::new()
        .max_retries(max_retries)
        .initial_delay(Duration::from_millis(1))
        .max_delay(Duration::from_millis(4))
}

#[tokio::test]
async fn retries_transient_error_then_succeeds() {
    let (result, attempts) = run_counted(&fast(3), 2, transient).await;
    assert!(result.is_ok());
    assert_eq!(attempts, 3); // 2 failures + 1 success
}

#[tokio::test]
async fn gives_up_after_max_retries() {
    // max_retries = 2 means exactly 3 total attempts
    let (result, attempts) = run_counted(&fast(2), u32::MAX, transient).await;
    assert!(result.is_err());
    assert_eq!(attempts, 3);
}

#[tokio::test]
async fn excluded_status_makes_a_single_attempt() {
    let (result, attempts) =
        run_counted(&fast(5), u32::MAX, || DexError::NotFound("pokemon/0".into())).await;
    assert!(matches!(result, Err(DexError::NotFound(_))));
    assert_eq!(attempts, 1);
}

#[tokio::test]
async fn transport_errors_without_status_are_retried() {
    let (result, attempts) = run_counted(&fast(1), 1, || DexError::Http("timeout".into())).await;
    assert!(result.is_ok());
    assert_eq!(attempts, 2);
}

#[tokio::test]
async fn zero_retries_single_attempt() {
    let config = RetryConfig::disabled();
    let (result, attempts) = run_counted(&config, u32::MAX, transient).await;
    assert!(result.is_err());
    assert_eq!(attempts, 1);
}

#[tokio::test]
async fn backoff_grows_exponentially_between_attempts() {
    let config = RetryConfig::new()
        .max_retries(2)
        .initial_delay(Duration::from_millis(50))
        .max_delay(Duration::from_secs(1));

    let start = Instant::now();
    let (result, attempts) = run_counted(&config, u32::MAX, transient).await;
    let elapsed = start.elapsed();

    assert!(result.is_err());
    assert_eq!(attempts, 3);
    // waits were 50ms then 100ms; allow scheduling slack either side
    assert!(elapsed >= Duration::from_millis(140), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(600), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn backoff_is_capped_at_max_delay() {
    let config = RetryConfig::new()
        .max_retries(2)
        .initial_delay(Duration::from_millis(50))
        .max_delay(Duration::from_millis(60));

    let start = Instant::now();
    let (_, attempts) = run_counted(&config, u32::MAX, transient).await;
    let elapsed = start.elapsed();

    assert_eq!(attempts, 3);
    // waits were 50ms then 60ms (capped), never 100ms
    assert!(elapsed >= Duration::from_millis(100), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(400), "elapsed {elapsed:?}");
}
