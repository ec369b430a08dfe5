//! Request and outcome types for connector operations
//!
//! These are kube-independent so that the cluster port can be faked; each
//! option type converts to its kube-rs parameter struct with `to_params`.

use super::error::{ConnectorError, ConnectorResult};
use kube::api::{DeleteParams, ListParams, LogParams, PropagationPolicy};
use serde::{Deserialize, Serialize};

/// Status text historically returned by every mutating operation
pub const LEGACY_SUCCESS_STATUS: &str = "API Request was successful";

/// Cluster resource kinds handled by the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pod,
    Service,
    Deployment,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pod => "pod",
            Self::Service => "service",
            Self::Deployment => "deployment",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locates one object before it is mutated or deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
}

impl ResourceRef {
    pub fn deployment(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Deployment,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} in namespace {}", self.kind, self.name, self.namespace)
    }
}

/// Partial update of a deployment's replica count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleRequest {
    pub target: ResourceRef,
    pub replicas: i32,
}

impl ScaleRequest {
    /// Build a request from the caller's textual replica count
    pub fn parse(namespace: &str, name: &str, replicas: &str) -> ConnectorResult<Self> {
        let replicas: i32 = replicas.trim().parse().map_err(|_| {
            ConnectorError::InvalidArgument(format!(
                "desired replicas '{}' is not a whole number",
                replicas
            ))
        })?;

        if replicas < 0 {
            return Err(ConnectorError::InvalidArgument(format!(
                "desired replicas must not be negative, got {}",
                replicas
            )));
        }

        Ok(Self {
            target: ResourceRef::deployment(namespace, name),
            replicas,
        })
    }
}

/// Deletion settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePolicy {
    pub grace_period_seconds: u32,
    pub background_propagation: bool,
    /// Requested by the caller but not sent: the API server rejects
    /// `orphanDependents` together with a propagation policy
    pub orphan_dependents: bool,
}

impl Default for DeletePolicy {
    fn default() -> Self {
        Self {
            grace_period_seconds: 30,
            background_propagation: true,
            orphan_dependents: true,
        }
    }
}

impl DeletePolicy {
    pub fn to_params(&self) -> DeleteParams {
        DeleteParams {
            grace_period_seconds: Some(self.grace_period_seconds),
            propagation_policy: if self.background_propagation {
                Some(PropagationPolicy::Background)
            } else if self.orphan_dependents {
                Some(PropagationPolicy::Orphan)
            } else {
                None
            },
            ..Default::default()
        }
    }
}

/// List request settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Page size; effectively unbounded
    pub limit: u32,
    /// Server-side timeout in seconds
    pub timeout_secs: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: i32::MAX as u32,
            timeout_secs: 180,
        }
    }
}

impl ListOptions {
    pub fn with_timeout(timeout_secs: u32) -> Self {
        Self {
            timeout_secs,
            ..Default::default()
        }
    }

    pub fn to_params(&self) -> ListParams {
        ListParams::default()
            .limit(self.limit)
            .timeout(self.timeout_secs)
    }
}

/// Log request settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub tail_lines: i64,
    pub limit_bytes: i64,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            tail_lines: 40,
            limit_bytes: i64::from(i32::MAX),
        }
    }
}

impl LogOptions {
    pub fn with_tail(tail_lines: i64) -> Self {
        Self {
            tail_lines,
            ..Default::default()
        }
    }

    pub fn to_params(&self) -> LogParams {
        LogParams {
            tail_lines: Some(self.tail_lines),
            limit_bytes: Some(self.limit_bytes),
            follow: false,
            timestamps: false,
            ..Default::default()
        }
    }
}

/// Result of a scale, delete or create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum MutationOutcome {
    /// The request was accepted by the API server
    Applied,
    /// No deployment with the target name exists in the namespace
    NotFound,
    /// The request failed; nothing was applied
    Failed(String),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// The status text the platform has always received, whatever happened
    pub fn legacy_status(&self) -> &'static str {
        LEGACY_SUCCESS_STATUS
    }
}

impl std::fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::NotFound => write!(f, "not found"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}
