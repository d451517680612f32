pub mod aws;
pub mod cluster;
pub mod lifecycle;

pub use cluster::ClusterControl;
pub use lifecycle::LifecycleControl;
