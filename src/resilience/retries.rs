//! Retry logic.
//!
//! # Design Decisions
//! - Only transient ledger failures (network loss, timeouts) are retried
//! - Transaction submissions are never retried here; a resend could reuse a nonce
//! - Jittered backoff between attempts, bounded by `max_attempts`

use std::future::Future;

use crate::config::RetryConfig;
use crate::error::OracleResult;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Run `call` until it succeeds, fails permanently, or the attempts are exhausted.
pub async fn retry_transient<T, F, Fut>(policy: &RetryConfig, op: &'static str, mut call: F) -> OracleResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = OracleResult<T>>,
{
    let max_attempts = if policy.enabled {
        policy.max_attempts.max(1)
    } else {
        1
    };

    let mut attempt = 0;
    loop {
        attempt += 1;
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = calculate_backoff(attempt, policy.base_delay_ms, policy.max_delay_ms);
                tracing::warn!(
                    op,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient failure, retrying"
                );
                metrics::record_retry(op);
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
