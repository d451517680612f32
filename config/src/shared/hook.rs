use serde::{Deserialize, Serialize};

use crate::shared::{DrainConfig, RetryConfig, ValidationError};

/// Complete configuration for the drain hook service.
///
/// Aggregates the target cluster, the lifecycle notification queue, the drain
/// loop timings, and the retry policy for control plane calls. Loaded from the
/// layered configuration files at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DrainHookConfig {
    /// Name of the ECS cluster whose instances this hook drains.
    pub cluster: String,

    /// URL of the SQS queue subscribed to the lifecycle hook's SNS topic.
    pub queue_url: String,

    /// Optional AWS region override.
    ///
    /// When unset, the region is resolved from the ambient AWS environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Drain poll loop configuration.
    #[serde(default)]
    pub drain: DrainConfig,

    /// Retry policy for ECS and Auto Scaling control plane calls.
    #[serde(default)]
    pub control_plane_retry: RetryConfig,
}

impl DrainHookConfig {
    /// Validates the complete drain hook configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cluster.is_empty() {
            return Err(ValidationError::ClusterEmpty);
        }

        if self.queue_url.is_empty() {
            return Err(ValidationError::QueueUrlEmpty);
        }

        self.control_plane_retry.validate()?;

        self.drain.validate()
    }
}
