use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry an async operation, sleeping between attempts.
///
/// # Arguments
/// * `operation` - The async operation to retry
/// * `delays` - Seconds to wait after each failed attempt; the operation runs
///   `delays.len() + 1` times at most
///
/// # Returns
/// The first successful result, or the error of the last attempt
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, delays: &[u64]) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = delays.len() + 1;

    for (i, delay_secs) in delays.iter().enumerate() {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                warn!(
                    "Request failed (attempt {}/{attempts}): {e}. Retrying after {delay_secs}s...",
                    i + 1
                );
                sleep(Duration::from_secs(*delay_secs)).await;
            }
        }
    }

    operation().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Run `retry_with_backoff` over an operation that fails `failures`
    /// times before succeeding; returns the result and the call count.
    async fn run(failures: usize, delays: &[u64]) -> (Result<&'static str, String>, usize) {
        let calls = AtomicUsize::new(0);
        let result = retry_with_backoff(
            || {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call < failures {
                        Err(format!("status probe {call} failed"))
                    } else {
                        Ok("configured")
                    }
                }
            },
            delays,
        )
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn first_success_stops_retrying() {
        assert_eq!(run(0, &[0, 0]).await, (Ok("configured"), 1));
    }

    #[tokio::test]
    async fn recovers_on_the_last_attempt() {
        assert_eq!(run(2, &[0, 0]).await, (Ok("configured"), 3));
    }

    #[tokio::test]
    async fn gives_up_with_the_last_error() {
        let (result, calls) = run(usize::MAX, &[0, 0]).await;
        assert_eq!(result, Err("status probe 2 failed".to_string()));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn empty_schedule_means_one_attempt() {
        let (result, calls) = run(usize::MAX, &[]).await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
