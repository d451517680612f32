//! AWS-backed implementations of the control plane capabilities.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecs::types::ContainerInstanceStatus;

use crate::control::cluster::ClusterControl;
use crate::control::lifecycle::LifecycleControl;
use crate::error::{DrainError, DrainResult, ErrorKind};
use crate::event::TerminationEvent;
use crate::types::{ContainerInstanceArn, InstanceWorkloadState, SchedulingStatus};

/// Loads the ambient AWS configuration, optionally overriding the region.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }

    loader.load().await
}

/// [`ClusterControl`] implementation backed by the ECS control plane.
#[derive(Debug, Clone)]
pub struct EcsClusterControl {
    client: aws_sdk_ecs::Client,
}

impl EcsClusterControl {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_ecs::Client::new(sdk_config),
        }
    }
}

impl ClusterControl for EcsClusterControl {
    async fn list_container_instances(
        &self,
        cluster: &str,
        ec2_instance_id: &str,
    ) -> DrainResult<Vec<ContainerInstanceArn>> {
        let response = self
            .client
            .list_container_instances()
            .cluster(cluster)
            .filter(format!("ec2InstanceId=={ec2_instance_id}"))
            .send()
            .await
            .map_err(|err| classify_control_plane_error(err, "failed to list container instances"))?;

        Ok(response
            .container_instance_arns()
            .iter()
            .map(|arn| ContainerInstanceArn::new(arn.clone()))
            .collect())
    }

    async fn describe_container_instance(
        &self,
        cluster: &str,
        instance: &ContainerInstanceArn,
    ) -> DrainResult<Option<InstanceWorkloadState>> {
        let response = self
            .client
            .describe_container_instances()
            .cluster(cluster)
            .container_instances(instance.as_str())
            .send()
            .await
            .map_err(|err| {
                classify_control_plane_error(err, "failed to describe container instance")
            })?;

        let Some(described) = response.container_instances().first() else {
            return Ok(None);
        };

        Ok(Some(InstanceWorkloadState {
            status: SchedulingStatus::parse(described.status().unwrap_or_default()),
            running_tasks: described.running_tasks_count().max(0) as u64,
            pending_tasks: described.pending_tasks_count().max(0) as u64,
        }))
    }

    async fn begin_draining(
        &self,
        cluster: &str,
        instance: &ContainerInstanceArn,
    ) -> DrainResult<()> {
        self.client
            .update_container_instances_state()
            .cluster(cluster)
            .container_instances(instance.as_str())
            .status(ContainerInstanceStatus::Draining)
            .send()
            .await
            .map_err(|err| {
                classify_control_plane_error(err, "failed to set container instance to draining")
            })?;

        Ok(())
    }
}

/// [`LifecycleControl`] implementation backed by the Auto Scaling control plane.
#[derive(Debug, Clone)]
pub struct AsgLifecycleControl {
    client: aws_sdk_autoscaling::Client,
}

impl AsgLifecycleControl {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_autoscaling::Client::new(sdk_config),
        }
    }
}

impl LifecycleControl for AsgLifecycleControl {
    async fn complete(&self, event: &TerminationEvent) -> DrainResult<()> {
        self.client
            .complete_lifecycle_action()
            .lifecycle_hook_name(&event.lifecycle_hook_name)
            .lifecycle_action_token(&event.lifecycle_action_token)
            .auto_scaling_group_name(&event.auto_scaling_group_name)
            .lifecycle_action_result("CONTINUE")
            .send()
            .await
            .map_err(|err| classify_lifecycle_error(err, "failed to complete lifecycle action"))?;

        Ok(())
    }

    async fn record_heartbeat(&self, event: &TerminationEvent) -> DrainResult<()> {
        self.client
            .record_lifecycle_action_heartbeat()
            .lifecycle_hook_name(&event.lifecycle_hook_name)
            .lifecycle_action_token(&event.lifecycle_action_token)
            .auto_scaling_group_name(&event.auto_scaling_group_name)
            .send()
            .await
            .map_err(|err| classify_lifecycle_error(err, "failed to record lifecycle heartbeat"))?;

        Ok(())
    }
}

/// Maps an SDK error onto the drain error taxonomy.
///
/// Transport-level failures and throttling are transient; service rejections
/// propagate as non-retryable.
fn classify_control_plane_error<E>(err: SdkError<E>, desc: &'static str) -> DrainError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let kind = if matches!(
        err,
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_)
    ) {
        ErrorKind::ControlPlaneUnavailable
    } else {
        match err.code() {
            Some(
                "Throttling"
                | "ThrottlingException"
                | "RequestThrottled"
                | "RequestLimitExceeded"
                | "TooManyRequestsException",
            ) => ErrorKind::ControlPlaneThrottled,
            Some(_) => ErrorKind::ControlPlaneRequestFailed,
            None => ErrorKind::Unknown,
        }
    };

    DrainError::from((kind, desc, DisplayErrorContext(&err).to_string()))
}

/// Maps an SDK error from a lifecycle action call onto the drain error taxonomy.
///
/// The Auto Scaling API signals "no action is pending for this token" as a
/// `ValidationError`, which happens whenever the action was already completed
/// by another path or its heartbeat timeout elapsed. The same code also covers
/// genuinely invalid parameters (a misspelled group or hook name), which this
/// mapping cannot tell apart; the full error text is preserved in the detail
/// so the log line still names the real cause.
fn classify_lifecycle_error<E>(err: SdkError<E>, desc: &'static str) -> DrainError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    if let SdkError::ServiceError(_) = &err
        && err.code() == Some("ValidationError")
    {
        return DrainError::from((
            ErrorKind::LifecycleActionNotPending,
            desc,
            DisplayErrorContext(&err).to_string(),
        ));
    }

    classify_control_plane_error(err, desc)
}
