//! Resolution of raw EC2 instance ids to cluster instance handles.

use config::shared::RetryConfig;
use tracing::warn;

use crate::control::ClusterControl;
use crate::error::DrainResult;
use crate::retry::retry_with_backoff;
use crate::types::ContainerInstanceArn;

/// Resolves a raw EC2 instance id to the cluster's container instance handle.
///
/// Returns `Ok(None)` when the cluster has no matching registration, which is
/// a legitimate terminal state: the instance is terminating before it ever
/// joined the cluster, so there is nothing to drain.
pub async fn resolve_container_instance<C>(
    cluster_control: &C,
    retry: &RetryConfig,
    cluster: &str,
    ec2_instance_id: &str,
) -> DrainResult<Option<ContainerInstanceArn>>
where
    C: ClusterControl + Sync,
{
    let mut arns = retry_with_backoff(retry, "list_container_instances", || {
        cluster_control.list_container_instances(cluster, ec2_instance_id)
    })
    .await?;

    if arns.len() > 1 {
        // The cluster keeps one registration per EC2 instance; more than one
        // match means the filter matched unexpectedly broadly.
        warn!(
            ec2_instance_id,
            matches = arns.len(),
            "multiple container instances matched one EC2 instance id, using the first"
        );
    }

    Ok(if arns.is_empty() {
        None
    } else {
        Some(arns.swap_remove(0))
    })
}
