use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Retry policy for control plane calls subject to throttling and transient failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts before the call is given up on.
    pub max_attempts: u32,

    /// Initial delay, in milliseconds, before the first retry.
    pub initial_delay_ms: u64,

    /// Maximum delay between retries.
    pub max_delay_ms: u64,

    /// Exponential backoff multiplier applied to the delay after each attempt.
    pub backoff_factor: f32,
}

impl RetryConfig {
    /// Validates the retry policy.
    ///
    /// The delays and the backoff factor are multiplied together at retry
    /// time, so values that would hot-loop or produce a negative delay are
    /// rejected here rather than at the first transient failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::RetryAttemptsZero);
        }

        if self.initial_delay_ms == 0 || self.max_delay_ms == 0 {
            return Err(ValidationError::RetryDelayZero);
        }

        if self.backoff_factor.is_nan() || self.backoff_factor < 1.0 {
            return Err(ValidationError::RetryBackoffFactorInvalid);
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 200,
            max_delay_ms: 5_000,
            backoff_factor: 2.0,
        }
    }
}
