use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// How often and how patiently a failing request is retried.
///
/// Attempt `n` (1-based) that fails waits `backoff[n - 1]` before the next
/// attempt; once the backoff list is used up, up to `final_retries` further
/// attempts are made `final_delay` apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub backoff: Vec<Duration>,
    pub final_retries: usize,
    pub final_delay: Duration,
}

impl Default for RetryPolicy {
    /// A live conversation cannot stall for long: 1s, 2s, then two more tries 4s apart.
    fn default() -> Self {
        Self {
            backoff: vec![Duration::from_secs(1), Duration::from_secs(2)],
            final_retries: 2,
            final_delay: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            backoff: Vec::new(),
            final_retries: 0,
            final_delay: Duration::ZERO,
        }
    }

    /// Total attempts, the first one included.
    #[must_use]
    pub fn attempts(&self) -> usize {
        (self.backoff.len() + self.final_retries).max(1)
    }

    /// Delay to wait after failed attempt `attempt`, or `None` if it was the last.
    #[must_use]
    pub fn delay_after(&self, attempt: usize) -> Option<Duration> {
        if attempt >= self.attempts() {
            return None;
        }
        Some(
            attempt
                .checked_sub(1)
                .and_then(|i| self.backoff.get(i))
                .copied()
                .unwrap_or(self.final_delay),
        )
    }
}

/// Retry an async operation following `policy`.
///
/// Returns the first success, or the error of the last attempt.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, policy: &RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let total = policy.attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                let Some(delay) = policy.delay_after(attempt) else {
                    return Err(e);
                };
                warn!(
                    "Request failed (attempt {attempt}/{total}): {e}. Retrying after {}ms...",
                    delay.as_millis()
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quick_policy() -> RetryPolicy {
        RetryPolicy {
            backoff: vec![Duration::from_millis(1), Duration::from_millis(2)],
            final_retries: 2,
            final_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_delay_schedule() {
        let policy = quick_policy();
        assert_eq!(policy.attempts(), 4);
        assert_eq!(policy.delay_after(1), Some(Duration::from_millis(1)));
        assert_eq!(policy.delay_after(2), Some(Duration::from_millis(2)));
        assert_eq!(policy.delay_after(3), Some(Duration::from_millis(1)));
        assert_eq!(policy.delay_after(4), None);
        assert_eq!(RetryPolicy::none().delay_after(1), None);
    }

    #[tokio::test]
    async fn retry_succeeds_on_first_attempt() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), String>(())
                }
            },
            &quick_policy(),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_succeeds_after_failures() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if count < 3 {
                        Err(String::from("fail"))
                    } else {
                        Ok(())
                    }
                }
            },
            &quick_policy(),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_returns_last_error() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(format!("fail {count}"))
                }
            },
            &quick_policy(),
        )
        .await;
        assert_eq!(result, Err("fail 4".to_string()));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn no_retry_policy_tries_once() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(String::from("fail"))
                }
            },
            &RetryPolicy::none(),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
