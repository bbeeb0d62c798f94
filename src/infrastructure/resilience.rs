//! Resilience policy for external API calls.
//!
//! Calls to the scanning and scoring services retry transient failures with
//! a fixed inter-attempt delay. The policy is explicit rather than
//! exception-shaped: callers get a result after a bounded number of
//! attempts, and what happens on exhaustion is their decision.

use std::time::Duration;

use crate::application::errors::ApiError;

/// Fixed-delay retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Execute an operation under a fixed-delay retry policy.
///
/// Retries only errors classified as transient by [`is_retryable_error`];
/// everything else is returned immediately. The error from the final attempt
/// is returned on exhaustion.
pub async fn retry_with_fixed_delay<F, Fut, T>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ApiError>>,
{
    let mut attempts = 0;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if attempts >= policy.max_attempts || !is_retryable_error(&error) {
                    return Err(error);
                }

                tracing::debug!(
                    attempt = attempts,
                    max_attempts = policy.max_attempts,
                    delay_ms = policy.delay.as_millis(),
                    error = %error,
                    "Retrying operation after fixed delay"
                );

                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

/// Check if an error is retryable.
pub fn is_retryable_error(error: &ApiError) -> bool {
    match error {
        ApiError::Network(_) => true,
        ApiError::ServiceUnavailable => true,
        ApiError::Http { status, .. } => {
            // Retry on server errors and rate limiting
            *status >= 500 || *status == 429
        }
    }
}
