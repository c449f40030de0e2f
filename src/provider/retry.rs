use std::future::Future;
use std::time::Duration;

use crate::error::{Result, TtsError};

/// Upstream statuses worth another attempt
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Exponential backoff for transient upstream failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Wait before retry number `attempt` (0-based): base * 2^(attempt + 1)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt + 1).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Whether an error is transient and the request may be sent again
pub fn is_retryable(err: &TtsError) -> bool {
    match err {
        TtsError::Network(_) | TtsError::Timeout(_) => true,
        other => other
            .upstream_status()
            .map_or(false, |status| RETRYABLE_STATUSES.contains(&status)),
    }
}

/// Run `op`, retrying transient failures according to `policy`
///
/// Non-retryable errors and the error of the final attempt are returned as-is.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_retries && is_retryable(&err) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "Transient provider error (attempt {}/{}), retrying in {:?}: {}",
                    attempt + 1,
                    policy.max_retries + 1,
                    delay,
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_millis(1))
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(2));
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(8));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(is_retryable(&TtsError::RateLimited));
        assert!(is_retryable(&TtsError::Upstream {
            status: 503,
            body: String::new()
        }));
        assert!(!is_retryable(&TtsError::Upstream {
            status: 400,
            body: String::new()
        }));
        assert!(!is_retryable(&TtsError::EmptyAudio));
        assert!(!is_retryable(&TtsError::ContentBlocked));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = with_retry(fast_policy(2), || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(TtsError::Upstream {
                        status: 503,
                        body: "busy".to_string(),
                    })
                } else {
                    Ok("audio")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "audio");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<()> = with_retry(fast_policy(2), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(TtsError::RateLimited)
            }
        })
        .await;

        assert!(matches!(result, Err(TtsError::RateLimited)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<()> = with_retry(fast_policy(5), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(TtsError::TextInsteadOfAudio("hello".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(TtsError::TextInsteadOfAudio(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
