use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The target ECS cluster must be named.
    #[error("`cluster` cannot be empty")]
    ClusterEmpty,
    /// The lifecycle notification queue must be set.
    #[error("`queue_url` cannot be empty")]
    QueueUrlEmpty,
    /// A zero poll interval would hot-loop against the cluster control plane.
    #[error("`drain.poll_interval_ms` cannot be zero")]
    PollIntervalZero,
    /// A zero heartbeat interval would hot-loop against the lifecycle control plane.
    #[error("`drain.heartbeat_interval_ms` cannot be zero")]
    HeartbeatIntervalZero,
    /// Retrying zero times means never issuing the call at all.
    #[error("`control_plane_retry.max_attempts` cannot be zero")]
    RetryAttemptsZero,
    /// A zero retry delay would hot-loop against the control plane.
    #[error("`control_plane_retry.initial_delay_ms` and `control_plane_retry.max_delay_ms` cannot be zero")]
    RetryDelayZero,
    /// A backoff factor below one would shrink delays, and a negative or NaN
    /// factor cannot be applied to a delay at all.
    #[error("`control_plane_retry.backoff_factor` must be at least 1.0")]
    RetryBackoffFactorInvalid,
}
