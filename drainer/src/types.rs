use std::fmt;

/// The cluster control plane's handle for a registered compute instance.
///
/// Distinct from the raw EC2 instance id: an instance that never registered
/// with the cluster has no container instance ARN at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerInstanceArn(String);

impl ContainerInstanceArn {
    pub fn new(arn: impl Into<String>) -> Self {
        Self(arn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerInstanceArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContainerInstanceArn {
    fn from(arn: String) -> Self {
        Self(arn)
    }
}

/// Scheduling status of a container instance as reported by the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulingStatus {
    /// The instance accepts new task placements.
    Active,
    /// The instance is finishing existing tasks and accepts no new placements.
    Draining,
    /// Any other status (for example `DEREGISTERING` or `REGISTRATION_FAILED`).
    Other(String),
}

impl SchedulingStatus {
    /// Parses the cluster control plane's status string.
    pub fn parse(status: &str) -> Self {
        match status {
            "ACTIVE" => Self::Active,
            "DRAINING" => Self::Draining,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SchedulingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("ACTIVE"),
            Self::Draining => f.write_str("DRAINING"),
            Self::Other(status) => f.write_str(status),
        }
    }
}

/// Point-in-time workload observation for a container instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceWorkloadState {
    /// Scheduling status at the time of observation.
    pub status: SchedulingStatus,
    /// Number of tasks currently running on the instance.
    pub running_tasks: u64,
    /// Number of tasks pending placement on the instance.
    pub pending_tasks: u64,
}

impl InstanceWorkloadState {
    /// Total outstanding workload on the instance.
    pub fn task_total(&self) -> u64 {
        self.running_tasks + self.pending_tasks
    }
}

/// Terminal outcome of one drain poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainDecision {
    /// The instance carries no outstanding workload and may be terminated.
    ReadyToTerminate,
    /// The instance still carries workload, or its draining transition was
    /// issued this cycle and cannot be trusted yet.
    StillDraining,
    /// The instance is no longer registered with the cluster; terminating it
    /// cannot interrupt any task.
    InstanceNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduling_status_parses_known_and_unknown_values() {
        assert_eq!(SchedulingStatus::parse("ACTIVE"), SchedulingStatus::Active);
        assert_eq!(
            SchedulingStatus::parse("DRAINING"),
            SchedulingStatus::Draining
        );
        assert_eq!(
            SchedulingStatus::parse("DEREGISTERING"),
            SchedulingStatus::Other("DEREGISTERING".to_string())
        );
    }

    #[test]
    fn task_total_sums_running_and_pending() {
        let workload = InstanceWorkloadState {
            status: SchedulingStatus::Draining,
            running_tasks: 2,
            pending_tasks: 1,
        };
        assert_eq!(workload.task_total(), 3);
    }
}
