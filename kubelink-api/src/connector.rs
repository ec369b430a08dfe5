//! Connector operations
//!
//! [`KubeConnector`] exposes the six operations the hosting platform calls.
//! Every call reads the connection settings, asks the provisioner for a new
//! cluster handle, and runs its cluster requests in sequence.

use std::path::Path;
use std::sync::Arc;

use kubelink_common::{DataShape, InfoTable, SchemaResolver};

use crate::config::ConnectorConfig;
use crate::kubernetes::cluster::{ClusterProvisioner, KubeProvisioner};
use crate::kubernetes::error::{ConnectorError, ConnectorResult};
use crate::kubernetes::networking::services;
use crate::kubernetes::observability::logs;
use crate::kubernetes::types::{
    DeletePolicy, ListOptions, LogOptions, MutationOutcome, ResourceRef, ScaleRequest,
};
use crate::kubernetes::workloads::manifest::{self, ManifestLoader};
use crate::kubernetes::workloads::{deployments, pods};

/// Entry point for the connector's operations
pub struct KubeConnector<P: ClusterProvisioner = KubeProvisioner> {
    config: ConnectorConfig,
    shapes: Arc<dyn SchemaResolver>,
    provisioner: P,
    manifests: ManifestLoader,
    delete_policy: DeletePolicy,
}

impl KubeConnector<KubeProvisioner> {
    /// Connector for live clusters
    pub fn live(config: ConnectorConfig, shapes: Arc<dyn SchemaResolver>) -> Self {
        Self::new(config, shapes, KubeProvisioner::new())
    }
}

impl<P: ClusterProvisioner> KubeConnector<P> {
    pub fn new(config: ConnectorConfig, shapes: Arc<dyn SchemaResolver>, provisioner: P) -> Self {
        let manifests = ManifestLoader::new(config.defaults.manifest_path.clone());

        Self {
            config,
            shapes,
            provisioner,
            manifests,
            delete_policy: DeletePolicy::default(),
        }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn provisioner(&self) -> &P {
        &self.provisioner
    }

    /// Resolve the namespace argument; empty or absent means the default
    pub fn resolve_namespace(&self, namespace: Option<&str>) -> String {
        match namespace.map(str::trim) {
            Some(ns) if !ns.is_empty() => ns.to_string(),
            _ => {
                let default = &self.config.defaults.namespace;
                tracing::warn!(namespace = %default, "No namespace given, using default");
                default.clone()
            }
        }
    }

    fn resolve_shape(&self, name: &str) -> ConnectorResult<DataShape> {
        self.shapes
            .resolve(name)
            .ok_or_else(|| ConnectorError::SchemaNotFound(name.to_string()))
    }

    async fn cluster(&self) -> ConnectorResult<P::Cluster> {
        let settings = self.config.connection.clone();
        self.provisioner.provision(&settings).await
    }

    fn list_options(&self) -> ListOptions {
        ListOptions::with_timeout(self.config.defaults.list_timeout_secs)
    }

    /// List pods as rows of the named data shape
    pub async fn list_pods(
        &self,
        namespace: Option<&str>,
        shape_name: &str,
    ) -> ConnectorResult<InfoTable> {
        let namespace = self.resolve_namespace(namespace);
        let shape = self.resolve_shape(shape_name)?;
        let cluster = self.cluster().await?;

        pods::list_pods(&cluster, &namespace, &shape, &self.list_options()).await
    }

    /// List services as rows of the named data shape
    pub async fn list_services(
        &self,
        namespace: Option<&str>,
        shape_name: &str,
    ) -> ConnectorResult<InfoTable> {
        let namespace = self.resolve_namespace(namespace);
        let shape = self.resolve_shape(shape_name)?;
        let cluster = self.cluster().await?;

        services::list_services(&cluster, &namespace, &shape, &self.list_options()).await
    }

    /// Set the replica count of an existing deployment
    ///
    /// `replicas` arrives as text and must be a non-negative whole number.
    pub async fn scale_deployment(
        &self,
        namespace: Option<&str>,
        deployment_name: &str,
        replicas: &str,
    ) -> ConnectorResult<MutationOutcome> {
        let namespace = self.resolve_namespace(namespace);
        let request = ScaleRequest::parse(&namespace, deployment_name, replicas)?;
        let cluster = self.cluster().await?;

        Ok(deployments::scale_deployment(&cluster, &request, &self.list_options()).await)
    }

    /// Delete an existing deployment
    pub async fn delete_extension_deployment(
        &self,
        namespace: Option<&str>,
        deployment_name: &str,
    ) -> ConnectorResult<MutationOutcome> {
        let namespace = self.resolve_namespace(namespace);
        let target = ResourceRef::deployment(namespace, deployment_name);
        let cluster = self.cluster().await?;

        Ok(deployments::delete_deployment(
            &cluster,
            &target,
            &self.delete_policy,
            &self.list_options(),
        )
        .await)
    }

    /// Create a deployment from a manifest file
    pub async fn create_deployment(
        &self,
        namespace: Option<&str>,
        manifest_path: Option<&Path>,
        deployment_name: &str,
    ) -> ConnectorResult<MutationOutcome> {
        let namespace = self.resolve_namespace(namespace);

        let text = match self.manifests.read(manifest_path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(namespace = %namespace, deployment = %deployment_name, "{}", e);
                return Ok(MutationOutcome::Failed(e.to_string()));
            }
        };

        let cluster = self.cluster().await?;

        Ok(manifest::deploy(&cluster, &namespace, &text, deployment_name).await)
    }

    /// Fetch the most recent log lines of a pod
    pub async fn get_pod_logs(
        &self,
        namespace: Option<&str>,
        pod_name: &str,
    ) -> ConnectorResult<String> {
        let namespace = self.resolve_namespace(namespace);
        let cluster = self.cluster().await?;
        let options = LogOptions::with_tail(self.config.defaults.log_tail_lines);

        logs::get_pod_logs(&cluster, &namespace, pod_name, &options).await
    }
}
