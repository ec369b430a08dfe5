//! Manifest deployment
//!
//! Turns manifest text into a Deployment and submits it for creation.

use std::path::{Path, PathBuf};

use k8s_openapi::api::apps::v1::Deployment;

use crate::kubernetes::cluster::ClusterApi;
use crate::kubernetes::error::{ConnectorError, ConnectorResult};
use crate::kubernetes::types::MutationOutcome;
use crate::log_cluster_operation;

/// Reads manifest text from disk, falling back to a configured default path
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    default_path: PathBuf,
}

impl ManifestLoader {
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
        }
    }

    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// Resolve the path to read; an absent or blank path means the default
    pub fn resolve<'a>(&'a self, path: Option<&'a Path>) -> &'a Path {
        match path {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => &self.default_path,
        }
    }

    pub async fn read(&self, path: Option<&Path>) -> ConnectorResult<String> {
        let path = self.resolve(path);
        tracing::debug!(path = %path.display(), "Reading manifest");

        tokio::fs::read_to_string(path).await.map_err(|e| {
            ConnectorError::Manifest(format!("Failed to read {}: {}", path.display(), e))
        })
    }
}

/// Parse YAML (or JSON) manifest text into a Deployment
pub fn parse_deployment(text: &str) -> ConnectorResult<Deployment> {
    if text.trim().is_empty() {
        return Err(ConnectorError::Manifest("manifest is empty".to_string()));
    }

    serde_yaml::from_str(text).map_err(|e| ConnectorError::Manifest(e.to_string()))
}

/// Create the deployment described by `manifest` in `namespace`
///
/// The manifest's namespace is replaced by the target namespace.
pub async fn deploy(
    cluster: &dyn ClusterApi,
    namespace: &str,
    manifest: &str,
    deployment_name: &str,
) -> MutationOutcome {
    let mut deployment = match parse_deployment(manifest) {
        Ok(deployment) => deployment,
        Err(e) => {
            tracing::warn!(namespace = %namespace, deployment = %deployment_name, "{}", e);
            return MutationOutcome::Failed(e.to_string());
        }
    };

    if let Some(declared) = deployment.metadata.namespace.as_deref() {
        if declared != namespace {
            tracing::debug!(declared = %declared, namespace = %namespace, "Overriding manifest namespace");
        }
    }
    deployment.metadata.namespace = Some(namespace.to_string());

    let manifest_name = deployment.metadata.name.clone().unwrap_or_default();
    if !deployment_name.is_empty() && manifest_name != deployment_name {
        tracing::warn!(
            requested = %deployment_name,
            manifest = %manifest_name,
            "Deployment name differs from manifest metadata.name"
        );
    }

    match cluster.create_deployment(namespace, &deployment).await {
        Ok(created) => {
            log_cluster_operation!(
                "create_deployment",
                namespace,
                created.metadata.name.as_deref().unwrap_or(&manifest_name)
            );
            MutationOutcome::Applied
        }
        Err(e) => {
            tracing::warn!(namespace = %namespace, deployment = %manifest_name, "Create request failed: {}", e);
            MutationOutcome::Failed(e.to_string())
        }
    }
}
