//! Retry with exponential back-off and jitter for scheduling API requests.
//!
//! Every request the client makes is an idempotent GET, so transient failures
//! (timeouts, refused connections, 429, 5xx) are retried a bounded number of
//! times. Everything else is returned on the first failure.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection refused/reset.
/// - HTTP 429 and 5xx responses.
///
/// **Not retriable:** every other variant. A 4xx, a malformed body or a
/// missing service will not change on a second attempt.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        ClientError::Deserialize { .. }
        | ClientError::NoGeocodeResult { .. }
        | ClientError::ServiceNotFound { .. }
        | ClientError::PaginationLimit { .. }
        | ClientError::InvalidBaseUrl { .. }
        | ClientError::InvalidHeader { .. } => false,
    }
}

/// Longest sleep between two attempts.
const MAX_DELAY_MS: u64 = 60_000;

/// How many times a request is re-sent after a transient failure, and how
/// long to wait in between.
///
/// The wait before retry `n` (1-based) is `backoff_base_ms × 2ⁿ⁻¹`, capped at
/// [`MAX_DELAY_MS`], then scaled by a random factor in `[0.75, 1.25)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    max_retries: u32,
    backoff_base_ms: u64,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
        }
    }

    /// Un-jittered delay before retry number `retry` (1-based).
    #[must_use]
    pub fn base_delay_ms(&self, retry: u32) -> u64 {
        let exponent = retry.saturating_sub(1).min(10);
        self.backoff_base_ms
            .saturating_mul(1u64 << exponent)
            .min(MAX_DELAY_MS)
    }

    /// Runs `operation`, re-running it while it fails with a retriable error
    /// and retries remain. The last error is returned as-is.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if retry >= self.max_retries || !is_retriable(&err) {
                return Err(err);
            }
            retry += 1;

            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_precision_loss
            )]
            let delay_ms =
                (self.base_delay_ms(retry) as f64 * rand::random_range(0.75_f64..1.25)) as u64;
            tracing::warn!(
                retry,
                max_retries = self.max_retries,
                delay_ms,
                error = %err,
                "scheduling API request failed, retrying"
            );
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}
