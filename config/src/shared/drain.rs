use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Default interval between workload polls while an instance drains.
const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;

/// Default interval between lifecycle heartbeats recorded while draining.
///
/// Must stay well below the lifecycle hook's heartbeat timeout so the hook
/// window is extended before it expires.
const DEFAULT_HEARTBEAT_INTERVAL_MS: u64 = 120_000;

/// Timing configuration for the drain poll loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrainConfig {
    /// Interval, in milliseconds, between workload polls while an instance drains.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Interval, in milliseconds, between lifecycle heartbeats recorded while draining.
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    /// Optional hard cap, in milliseconds, on the total time spent draining one instance.
    ///
    /// When unset the coordinator waits for the workload to empty, extending the
    /// lifecycle window through heartbeats. When set, the instance is released
    /// once the cap elapses even if tasks are still scheduled on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_drain_ms: Option<u64>,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_heartbeat_interval_ms() -> u64 {
    DEFAULT_HEARTBEAT_INTERVAL_MS
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            heartbeat_interval_ms: DEFAULT_HEARTBEAT_INTERVAL_MS,
            max_drain_ms: None,
        }
    }
}

impl DrainConfig {
    /// Validates the drain loop timings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::PollIntervalZero);
        }

        if self.heartbeat_interval_ms == 0 {
            return Err(ValidationError::HeartbeatIntervalZero);
        }

        Ok(())
    }
}
