//! Connector error types
//!
//! Reader operations propagate these to the caller. Mutating operations fold
//! cluster and manifest failures into a `MutationOutcome` instead.

use crate::config::ConfigError;
use kubelink_common::{CoercionError, TableError};
use thiserror::Error;

/// Connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Endpoint malformed, unreachable, or client construction failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Caller-referenced data shape does not resolve
    #[error("Data shape not found: {0}")]
    SchemaNotFound(String),

    /// A cluster API call failed
    #[error("Cluster request '{operation}' failed: {source}")]
    ClusterRequest {
        operation: &'static str,
        #[source]
        source: kube::Error,
    },

    /// A value could not be converted to its declared type
    #[error("Type coercion error: {0}")]
    TypeCoercion(#[from] CoercionError),

    /// Primitive argument rejected before any cluster call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Manifest text could not be turned into a deployment
    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Projected row did not fit its table's shape
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

/// Coarse classification of a [`ConnectorError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    SchemaNotFound,
    ClusterRequest,
    TypeCoercion,
    InvalidArgument,
    Manifest,
    Configuration,
    Internal,
}

impl ConnectorError {
    /// Build a mapper that tags a kube error with the failing operation
    pub(crate) fn cluster(operation: &'static str) -> impl FnOnce(kube::Error) -> Self {
        move |source| ConnectorError::ClusterRequest { operation, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConnectorError::Connection(_) => ErrorKind::Connection,
            ConnectorError::SchemaNotFound(_) => ErrorKind::SchemaNotFound,
            ConnectorError::ClusterRequest { .. } => ErrorKind::ClusterRequest,
            ConnectorError::TypeCoercion(_) => ErrorKind::TypeCoercion,
            ConnectorError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ConnectorError::Manifest(_) => ErrorKind::Manifest,
            ConnectorError::Config(_) => ErrorKind::Configuration,
            ConnectorError::Table(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status returned by the API server, if the cluster answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ConnectorError::ClusterRequest {
                source: kube::Error::Api(response),
                ..
            } => Some(response.code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type alias for connector operations
pub type ConnectorResult<T> = std::result::Result<T, ConnectorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kube::error::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("pods \"web-9\" {}", reason),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn test_cluster_error_exposes_status() {
        let err = ConnectorError::cluster("get_pod_logs")(api_error(404, "NotFound"));

        assert_eq!(err.kind(), ErrorKind::ClusterRequest);
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("get_pod_logs"));
    }

    #[test]
    fn test_forbidden_is_not_not_found() {
        let err = ConnectorError::cluster("list_pods")(api_error(403, "Forbidden"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            ConnectorError::SchemaNotFound("PodShape".into()).kind(),
            ErrorKind::SchemaNotFound
        );
        assert_eq!(
            ConnectorError::Config(ConfigError::Parse("bad".into())).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(ConnectorError::Connection("down".into()).status_code(), None);
    }

    #[test]
    fn test_coercion_failure_converts() {
        let err = ConnectorError::from(CoercionError {
            value: "\"web\"".to_string(),
            target: kubelink_common::BaseType::Integer,
            reason: "invalid digit found in string".to_string(),
        });

        assert_eq!(err.kind(), ErrorKind::TypeCoercion);
        assert!(err.to_string().starts_with("Type coercion error"));
    }
}
