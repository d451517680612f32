//! Bounded exponential backoff for control plane calls.

use std::future::Future;
use std::time::Duration;

use config::shared::RetryConfig;
use rand::Rng;
use tracing::warn;

use crate::error::DrainResult;

/// Runs `run` until it succeeds, fails with a non-transient error, or the
/// configured attempts are exhausted.
///
/// Only errors for which [`crate::error::DrainError::is_transient`] holds are
/// retried; everything else is returned to the caller immediately. Delays
/// grow by the configured backoff factor, capped at the maximum delay, with
/// jitter applied so concurrent invocations do not synchronize their retries.
pub async fn retry_with_backoff<T, F, Fut>(
    config: &RetryConfig,
    operation: &'static str,
    mut run: F,
) -> DrainResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DrainResult<T>>,
{
    let max_delay = Duration::from_millis(config.max_delay_ms);
    let mut delay = Duration::from_millis(config.initial_delay_ms).min(max_delay);
    let mut attempt = 1u32;

    loop {
        match run().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < config.max_attempts => {
                let wait = jittered(delay);
                warn!(
                    operation,
                    attempt,
                    max_attempts = config.max_attempts,
                    wait_ms = wait.as_millis() as u64,
                    error = %err,
                    "transient control plane failure, backing off"
                );
                tokio::time::sleep(wait).await;

                delay = delay.mul_f32(config.backoff_factor).min(max_delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Applies +/-20% jitter to a delay.
fn jittered(delay: Duration) -> Duration {
    let factor = rand::thread_rng().gen_range(0.8..1.2);
    delay.mul_f64(factor)
}
