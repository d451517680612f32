use std::future::Future;

use crate::error::DrainResult;
use crate::types::{ContainerInstanceArn, InstanceWorkloadState};

/// Capability over the cluster control plane.
///
/// The coordinator only needs three operations: find the container instance
/// registered for a raw EC2 instance id, observe an instance's workload, and
/// transition an instance into the draining status. All of them are
/// idempotent from the coordinator's point of view.
pub trait ClusterControl {
    /// Lists the container instances registered in `cluster` for the given
    /// EC2 instance id.
    ///
    /// An empty result is legitimate: the instance may terminate before it
    /// ever registers with the cluster.
    fn list_container_instances(
        &self,
        cluster: &str,
        ec2_instance_id: &str,
    ) -> impl Future<Output = DrainResult<Vec<ContainerInstanceArn>>> + Send;

    /// Describes the current workload of a container instance.
    ///
    /// Returns `None` when the cluster no longer has a record for the
    /// instance, which means it was deregistered and is safe to terminate.
    fn describe_container_instance(
        &self,
        cluster: &str,
        instance: &ContainerInstanceArn,
    ) -> impl Future<Output = DrainResult<Option<InstanceWorkloadState>>> + Send;

    /// Transitions a container instance into the `DRAINING` status.
    ///
    /// Safe to call on an instance that is already draining.
    fn begin_draining(
        &self,
        cluster: &str,
        instance: &ContainerInstanceArn,
    ) -> impl Future<Output = DrainResult<()>> + Send;
}
