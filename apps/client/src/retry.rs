//! A generic retry wrapper for one-shot async operations.
//!
//! The server never retries on the caller's behalf; this is the only retry
//! logic in the system, applied client-side and opt-in.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Invokes `op` up to `attempts` times, sleeping `base_delay * n` before the
/// n-th retry (linear backoff). The last error is surfaced after exhaustion.
pub async fn with_retry<T, E, F, Fut>(
    attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = attempts.max(1);

    let mut last_err = match op().await {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    for attempt in 1..attempts {
        warn!("Attempt {attempt}/{attempts} failed, retrying");
        tokio::time::sleep(base_delay * attempt).await;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => last_err = e,
        }
    }

    Err(last_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_late_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(3, Duration::from_millis(10), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err("transient")
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_surfaces_last_error_after_exhaustion() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = with_retry(3, Duration::from_millis(10), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(format!("failure {n}")) }
        })
        .await;

        assert_eq!(result.unwrap_err(), "failure 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_grows_linearly() {
        let start = tokio::time::Instant::now();
        let _: Result<(), &str> =
            with_retry(3, Duration::from_millis(100), || async { Err("nope") }).await;

        // Two retries: 100ms + 200ms of backoff.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(0, Duration::from_millis(10), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
