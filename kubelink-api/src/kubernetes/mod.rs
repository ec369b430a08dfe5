//! Kubernetes integration
//!
//! - Client construction from connection settings or a kubeconfig file
//! - The cluster API port and its live implementation
//! - Pod and service listing projected into data shapes
//! - Deployment scale, delete, and creation from a manifest
//! - Pod log retrieval

pub mod client;
pub mod cluster;
pub mod error;
pub mod reader;
pub mod types;

pub mod networking;
pub mod observability;
pub mod workloads;

pub use client::K8sClient;
pub use cluster::{ClusterApi, ClusterProvisioner, KubeCluster, KubeProvisioner};
pub use error::{ConnectorError, ConnectorResult, ErrorKind};
pub use types::{
    DeletePolicy, ListOptions, LogOptions, MutationOutcome, ResourceKind, ResourceRef,
    ScaleRequest, LEGACY_SUCCESS_STATUS,
};
