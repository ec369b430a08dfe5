//! Cluster access
//!
//! The [`ClusterApi`] port and the provisioner that creates handles for it.

pub mod api;
pub mod provisioner;

pub use api::{ClusterApi, KubeCluster};
pub use provisioner::{ClusterProvisioner, KubeProvisioner};
