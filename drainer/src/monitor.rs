//! The per-instance drain state machine.

use config::shared::RetryConfig;
use tracing::info;

use crate::control::ClusterControl;
use crate::error::DrainResult;
use crate::retry::retry_with_backoff;
use crate::types::{ContainerInstanceArn, DrainDecision, SchedulingStatus};

/// Observes one container instance's workload and steers it towards empty.
///
/// A monitor is bound to a single instance for a single coordinator
/// invocation. Each [`DrainMonitor::poll_once`] call yields one
/// [`DrainDecision`]; the caller owns pacing between cycles.
#[derive(Debug)]
pub struct DrainMonitor<'a, C> {
    cluster_control: &'a C,
    retry: &'a RetryConfig,
    cluster: &'a str,
    instance: ContainerInstanceArn,
}

impl<'a, C> DrainMonitor<'a, C>
where
    C: ClusterControl + Sync,
{
    pub fn new(
        cluster_control: &'a C,
        retry: &'a RetryConfig,
        cluster: &'a str,
        instance: ContainerInstanceArn,
    ) -> Self {
        Self {
            cluster_control,
            retry,
            cluster,
            instance,
        }
    }

    /// Returns the instance this monitor is bound to.
    pub fn instance(&self) -> &ContainerInstanceArn {
        &self.instance
    }

    /// Runs one poll cycle of the drain state machine.
    ///
    /// An instance that is still `ACTIVE` is transitioned to `DRAINING` and
    /// reported as [`DrainDecision::StillDraining`] regardless of its task
    /// counts: until the transition takes effect the scheduler may still
    /// place tasks on it, so a zero count observed in the same cycle cannot
    /// be trusted. Only an instance already out of `ACTIVE` with no running
    /// or pending tasks is [`DrainDecision::ReadyToTerminate`].
    pub async fn poll_once(&self) -> DrainResult<DrainDecision> {
        let workload = retry_with_backoff(self.retry, "describe_container_instance", || {
            self.cluster_control
                .describe_container_instance(self.cluster, &self.instance)
        })
        .await?;

        let Some(workload) = workload else {
            // Already deregistered; terminating the instance cannot interrupt
            // any task.
            return Ok(DrainDecision::InstanceNotFound);
        };

        if workload.status == SchedulingStatus::Active {
            info!(
                instance = %self.instance,
                "instance is still accepting placements, transitioning to draining"
            );
            retry_with_backoff(self.retry, "begin_draining", || {
                self.cluster_control
                    .begin_draining(self.cluster, &self.instance)
            })
            .await?;

            return Ok(DrainDecision::StillDraining);
        }

        let tasks = workload.task_total();
        if tasks == 0 {
            return Ok(DrainDecision::ReadyToTerminate);
        }

        info!(
            instance = %self.instance,
            status = %workload.status,
            running_tasks = workload.running_tasks,
            pending_tasks = workload.pending_tasks,
            "instance still has tasks"
        );

        Ok(DrainDecision::StillDraining)
    }
}
