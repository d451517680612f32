pub mod control;

use config::shared::{DrainConfig, RetryConfig};
use drainer::coordinator::DrainCoordinator;
use drainer::event::TerminationEvent;

use crate::common::control::{MemoryClusterControl, MemoryLifecycleControl};

pub const TEST_CLUSTER: &str = "test-cluster";

pub fn test_event() -> TerminationEvent {
    TerminationEvent {
        ec2_instance_id: "i-1".to_string(),
        lifecycle_hook_name: "H".to_string(),
        lifecycle_action_token: "T".to_string(),
        auto_scaling_group_name: "G".to_string(),
    }
}

pub fn fast_drain_config() -> DrainConfig {
    DrainConfig {
        poll_interval_ms: 5,
        heartbeat_interval_ms: 10_000,
        max_drain_ms: None,
    }
}

pub fn fast_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay_ms: 1,
        max_delay_ms: 5,
        backoff_factor: 2.0,
    }
}

pub fn create_coordinator(
    cluster_control: MemoryClusterControl,
    lifecycle_control: MemoryLifecycleControl,
    drain: DrainConfig,
) -> DrainCoordinator<MemoryClusterControl, MemoryLifecycleControl> {
    DrainCoordinator::new(
        cluster_control,
        lifecycle_control,
        TEST_CLUSTER.to_string(),
        drain,
        fast_retry_config(),
    )
}
