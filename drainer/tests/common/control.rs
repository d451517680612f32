//! In-memory control plane doubles that script workload sequences and record
//! every call for assertion.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use drainer::control::{ClusterControl, LifecycleControl};
use drainer::error::{DrainError, DrainResult};
use drainer::event::TerminationEvent;
use drainer::types::{ContainerInstanceArn, InstanceWorkloadState};
use tokio::sync::Mutex;

/// One recorded cluster control plane call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCall {
    List { ec2_instance_id: String },
    Describe { instance: String },
    BeginDraining { instance: String },
}

#[derive(Debug, Default)]
struct ClusterInner {
    registrations: HashMap<String, Vec<ContainerInstanceArn>>,
    workloads: HashMap<String, VecDeque<InstanceWorkloadState>>,
    describe_faults: VecDeque<DrainError>,
    calls: Vec<ClusterCall>,
}

/// In-memory [`ClusterControl`] double.
///
/// Workload sequences are scripted per container instance; once a sequence is
/// down to its last state, that state repeats for every further poll. An
/// instance with no scripted workload describes as absent.
#[derive(Debug, Clone, Default)]
pub struct MemoryClusterControl {
    inner: Arc<Mutex<ClusterInner>>,
}

impl MemoryClusterControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_instance(&self, ec2_instance_id: &str, arn: &str) {
        let mut inner = self.inner.lock().await;
        inner
            .registrations
            .entry(ec2_instance_id.to_string())
            .or_default()
            .push(ContainerInstanceArn::new(arn));
    }

    pub async fn script_workloads(&self, arn: &str, states: Vec<InstanceWorkloadState>) {
        let mut inner = self.inner.lock().await;
        inner.workloads.insert(arn.to_string(), states.into());
    }

    pub async fn push_describe_fault(&self, error: DrainError) {
        let mut inner = self.inner.lock().await;
        inner.describe_faults.push_back(error);
    }

    pub async fn calls(&self) -> Vec<ClusterCall> {
        let inner = self.inner.lock().await;
        inner.calls.clone()
    }

    pub async fn begin_draining_calls(&self) -> usize {
        self.calls()
            .await
            .iter()
            .filter(|call| matches!(call, ClusterCall::BeginDraining { .. }))
            .count()
    }

    pub async fn describe_calls(&self) -> usize {
        self.calls()
            .await
            .iter()
            .filter(|call| matches!(call, ClusterCall::Describe { .. }))
            .count()
    }
}

impl ClusterControl for MemoryClusterControl {
    async fn list_container_instances(
        &self,
        _cluster: &str,
        ec2_instance_id: &str,
    ) -> DrainResult<Vec<ContainerInstanceArn>> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(ClusterCall::List {
            ec2_instance_id: ec2_instance_id.to_string(),
        });

        Ok(inner
            .registrations
            .get(ec2_instance_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn describe_container_instance(
        &self,
        _cluster: &str,
        instance: &ContainerInstanceArn,
    ) -> DrainResult<Option<InstanceWorkloadState>> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(ClusterCall::Describe {
            instance: instance.as_str().to_string(),
        });

        if let Some(fault) = inner.describe_faults.pop_front() {
            return Err(fault);
        }

        let Some(states) = inner.workloads.get_mut(instance.as_str()) else {
            return Ok(None);
        };

        Ok(if states.len() > 1 {
            states.pop_front()
        } else {
            states.front().cloned()
        })
    }

    async fn begin_draining(
        &self,
        _cluster: &str,
        instance: &ContainerInstanceArn,
    ) -> DrainResult<()> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(ClusterCall::BeginDraining {
            instance: instance.as_str().to_string(),
        });

        Ok(())
    }
}

#[derive(Debug, Default)]
struct LifecycleInner {
    completions: Vec<TerminationEvent>,
    complete_attempts: u32,
    heartbeats: u32,
    complete_faults: VecDeque<DrainError>,
    heartbeat_faults: VecDeque<DrainError>,
}

/// In-memory [`LifecycleControl`] double recording completions and heartbeats.
#[derive(Debug, Clone, Default)]
pub struct MemoryLifecycleControl {
    inner: Arc<Mutex<LifecycleInner>>,
}

impl MemoryLifecycleControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_complete_fault(&self, error: DrainError) {
        let mut inner = self.inner.lock().await;
        inner.complete_faults.push_back(error);
    }

    pub async fn push_heartbeat_fault(&self, error: DrainError) {
        let mut inner = self.inner.lock().await;
        inner.heartbeat_faults.push_back(error);
    }

    /// Successful completions, in call order.
    pub async fn completions(&self) -> Vec<TerminationEvent> {
        let inner = self.inner.lock().await;
        inner.completions.clone()
    }

    /// Total completion attempts, including failed ones.
    pub async fn complete_attempts(&self) -> u32 {
        let inner = self.inner.lock().await;
        inner.complete_attempts
    }

    pub async fn heartbeats(&self) -> u32 {
        let inner = self.inner.lock().await;
        inner.heartbeats
    }
}

impl LifecycleControl for MemoryLifecycleControl {
    async fn complete(&self, event: &TerminationEvent) -> DrainResult<()> {
        let mut inner = self.inner.lock().await;
        inner.complete_attempts += 1;

        if let Some(fault) = inner.complete_faults.pop_front() {
            return Err(fault);
        }

        inner.completions.push(event.clone());
        Ok(())
    }

    async fn record_heartbeat(&self, _event: &TerminationEvent) -> DrainResult<()> {
        let mut inner = self.inner.lock().await;

        if let Some(fault) = inner.heartbeat_faults.pop_front() {
            return Err(fault);
        }

        inner.heartbeats += 1;
        Ok(())
    }
}
