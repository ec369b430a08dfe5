//! Kubelink API Library
//!
//! Kubernetes connector for the automation platform: lists pods and services
//! as rows of caller-defined data shapes, scales, deletes and creates
//! deployments, and fetches pod logs.

pub mod config;
pub mod connector;
pub mod kubernetes;
pub mod logging;
pub mod projection;

pub use config::{ConfigError, ConnectionSettings, ConnectorConfig, DefaultsConfig};
pub use connector::KubeConnector;
pub use kubernetes::{
    ClusterApi, ClusterProvisioner, ConnectorError, ConnectorResult, ErrorKind, KubeProvisioner,
    MutationOutcome,
};
pub use logging::{LogRotation, LoggingConfig};
