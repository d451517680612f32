//! Orchestration of one termination lifecycle event.
//!
//! Decode the notification, resolve the instance, poll it until its workload
//! empties, then release the lifecycle action. The coordinator holds no state
//! across invocations; correctness under redelivery rests on the idempotence
//! of the draining transition and the completion call.

use std::time::{Duration, Instant};

use config::shared::{DrainConfig, RetryConfig};
use tracing::{debug, error, info, warn};

use crate::concurrency::shutdown::ShutdownRx;
use crate::control::{ClusterControl, LifecycleControl};
use crate::error::{DrainResult, ErrorKind};
use crate::event::{Notification, TerminationEvent, decode_notification};
use crate::monitor::DrainMonitor;
use crate::resolve::resolve_container_instance;
use crate::retry::retry_with_backoff;
use crate::types::DrainDecision;

/// Terminal outcome of one coordinator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The notification was an autoscaling test notification; nothing to do.
    SkippedTestNotification,
    /// The notification was malformed and dropped without side effects.
    IgnoredMalformed,
    /// The instance was never registered with the cluster; the lifecycle
    /// action was released without polling.
    InstanceUnregistered,
    /// The instance drained to zero tasks and the lifecycle action was
    /// released.
    Drained,
    /// The configured drain cap elapsed with tasks still scheduled; the
    /// lifecycle action was released anyway.
    ForcedAfterDeadline,
    /// Shutdown was requested mid-drain; the instance was left draining and
    /// the lifecycle action was left pending for a later invocation.
    Interrupted,
}

/// Coordinates draining and lifecycle release for termination events.
///
/// One coordinator serves any number of concurrent invocations; each
/// invocation is independent and operates only on its own event.
#[derive(Debug)]
pub struct DrainCoordinator<C, L> {
    cluster_control: C,
    lifecycle_control: L,
    cluster: String,
    drain: DrainConfig,
    retry: RetryConfig,
}

impl<C, L> DrainCoordinator<C, L>
where
    C: ClusterControl + Sync,
    L: LifecycleControl + Sync,
{
    pub fn new(
        cluster_control: C,
        lifecycle_control: L,
        cluster: String,
        drain: DrainConfig,
        retry: RetryConfig,
    ) -> Self {
        Self {
            cluster_control,
            lifecycle_control,
            cluster,
            drain,
            retry,
        }
    }

    /// Handles one raw notification body end to end.
    ///
    /// Malformed notifications are logged and dropped without any control
    /// plane call; they are not worth a redelivery since the payload will not
    /// improve.
    pub async fn handle_notification(
        &self,
        body: &str,
        shutdown: ShutdownRx,
    ) -> DrainResult<DrainOutcome> {
        let event = match decode_notification(body) {
            Ok(Notification::Termination(event)) => event,
            Ok(Notification::Test) => {
                info!("skipping autoscaling test notification");
                return Ok(DrainOutcome::SkippedTestNotification);
            }
            Err(err) if err.kind() == ErrorKind::MalformedEvent => {
                warn!(error = %err, "dropping malformed lifecycle notification");
                return Ok(DrainOutcome::IgnoredMalformed);
            }
            Err(err) => return Err(err),
        };

        self.handle_event(event, shutdown).await
    }

    /// Handles one decoded termination event end to end.
    pub async fn handle_event(
        &self,
        event: TerminationEvent,
        mut shutdown: ShutdownRx,
    ) -> DrainResult<DrainOutcome> {
        let resolved = resolve_container_instance(
            &self.cluster_control,
            &self.retry,
            &self.cluster,
            &event.ec2_instance_id,
        )
        .await?;

        let Some(instance) = resolved else {
            info!(
                ec2_instance_id = event.ec2_instance_id,
                "instance is not registered with the cluster, releasing lifecycle action"
            );
            self.complete(&event).await?;
            return Ok(DrainOutcome::InstanceUnregistered);
        };

        info!(
            ec2_instance_id = event.ec2_instance_id,
            container_instance = %instance,
            "waiting for instance to drain"
        );

        let monitor = DrainMonitor::new(&self.cluster_control, &self.retry, &self.cluster, instance);

        let poll_interval = Duration::from_millis(self.drain.poll_interval_ms);
        let heartbeat_interval = Duration::from_millis(self.drain.heartbeat_interval_ms);
        let max_drain = self.drain.max_drain_ms.map(Duration::from_millis);

        let started = Instant::now();
        let mut last_heartbeat = started;
        let mut forced = false;

        loop {
            match monitor.poll_once().await? {
                DrainDecision::ReadyToTerminate => {
                    info!(
                        container_instance = %monitor.instance(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "instance has drained"
                    );
                    break;
                }
                DrainDecision::InstanceNotFound => {
                    info!(
                        container_instance = %monitor.instance(),
                        "instance deregistered while draining"
                    );
                    break;
                }
                DrainDecision::StillDraining => {}
            }

            if let Some(limit) = max_drain
                && started.elapsed() >= limit
            {
                // Releasing an instance that still has tasks breaks the
                // drain guarantee; the operator opted into this cap.
                error!(
                    container_instance = %monitor.instance(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    max_drain_ms = limit.as_millis() as u64,
                    "drain did not finish within the configured cap, releasing the instance with tasks still scheduled"
                );
                forced = true;
                break;
            }

            if last_heartbeat.elapsed() >= heartbeat_interval {
                self.record_heartbeat(&event).await;
                last_heartbeat = Instant::now();
            }

            tokio::select! {
                _ = shutdown.changed() => {
                    info!(
                        container_instance = %monitor.instance(),
                        "shutdown requested mid-drain, leaving instance draining"
                    );
                    return Ok(DrainOutcome::Interrupted);
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }

        self.complete(&event).await?;

        Ok(if forced {
            DrainOutcome::ForcedAfterDeadline
        } else {
            DrainOutcome::Drained
        })
    }

    /// Releases the lifecycle action with result `CONTINUE`.
    ///
    /// An action that is no longer pending is a benign race: the hook's own
    /// timeout elapsed or another invocation already completed it. Transient
    /// failures that exhaust their retries propagate so the trigger can
    /// redeliver; any other failure is logged and swallowed, since the hook's
    /// timeout is the ultimate safety net.
    async fn complete(&self, event: &TerminationEvent) -> DrainResult<()> {
        let result = retry_with_backoff(&self.retry, "complete_lifecycle_action", || {
            self.lifecycle_control.complete(event)
        })
        .await;

        match result {
            Ok(()) => {
                info!(
                    ec2_instance_id = event.ec2_instance_id,
                    lifecycle_hook = event.lifecycle_hook_name,
                    "lifecycle action completed"
                );
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::LifecycleActionNotPending => {
                info!(
                    ec2_instance_id = event.ec2_instance_id,
                    error = %err,
                    "lifecycle action already completed or expired"
                );
                Ok(())
            }
            Err(err) if err.is_transient() => Err(err),
            Err(err) => {
                error!(
                    ec2_instance_id = event.ec2_instance_id,
                    error = %err,
                    "failed to complete lifecycle action"
                );
                Ok(())
            }
        }
    }

    /// Records a lifecycle heartbeat, extending the hook's timeout window.
    ///
    /// Failures never abort the drain: the heartbeat repeats every interval,
    /// and if the action is no longer pending the completion call will sort
    /// it out at the end.
    async fn record_heartbeat(&self, event: &TerminationEvent) {
        match self.lifecycle_control.record_heartbeat(event).await {
            Ok(()) => {
                debug!(
                    ec2_instance_id = event.ec2_instance_id,
                    "recorded lifecycle heartbeat"
                );
            }
            Err(err) if err.kind() == ErrorKind::LifecycleActionNotPending => {
                debug!(
                    ec2_instance_id = event.ec2_instance_id,
                    "lifecycle action no longer pending, skipping heartbeat"
                );
            }
            Err(err) => {
                warn!(
                    ec2_instance_id = event.ec2_instance_id,
                    error = %err,
                    "failed to record lifecycle heartbeat"
                );
            }
        }
    }
}
