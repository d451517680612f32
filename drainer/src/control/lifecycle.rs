use std::future::Future;

use crate::error::DrainResult;
use crate::event::TerminationEvent;

/// Capability over the autoscaling lifecycle control plane.
pub trait LifecycleControl {
    /// Completes the lifecycle action for `event` with result `CONTINUE`,
    /// releasing the instance for termination.
    ///
    /// Fails with [`crate::error::ErrorKind::LifecycleActionNotPending`] when
    /// the action has already been completed or has expired; callers treat
    /// that as a benign outcome. The control plane reports invalid parameters
    /// under the same error code, so implementations may classify those as
    /// not-pending too; the logged detail carries the distinction.
    fn complete(&self, event: &TerminationEvent) -> impl Future<Output = DrainResult<()>> + Send;

    /// Records a heartbeat for the lifecycle action, extending the hook's
    /// timeout window while draining is still in progress.
    fn record_heartbeat(
        &self,
        event: &TerminationEvent,
    ) -> impl Future<Output = DrainResult<()>> + Send;
}
