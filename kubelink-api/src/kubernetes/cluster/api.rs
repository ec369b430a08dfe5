//! Cluster API port
//!
//! Every cluster call the connector makes goes through [`ClusterApi`], so the
//! operations can run against an in-memory cluster in tests.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};
use kube::api::{Api, PostParams};

use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::{ConnectorError, ConnectorResult};
use crate::kubernetes::types::{DeletePolicy, ListOptions, LogOptions};

/// Namespaced cluster operations used by the connector
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list_pods(&self, namespace: &str, options: &ListOptions) -> ConnectorResult<Vec<Pod>>;

    async fn list_services(
        &self,
        namespace: &str,
        options: &ListOptions,
    ) -> ConnectorResult<Vec<Service>>;

    async fn list_deployments(
        &self,
        namespace: &str,
        options: &ListOptions,
    ) -> ConnectorResult<Vec<Deployment>>;

    /// Submit a full replace of an existing deployment
    async fn replace_deployment(
        &self,
        namespace: &str,
        name: &str,
        deployment: &Deployment,
    ) -> ConnectorResult<Deployment>;

    async fn delete_deployment(
        &self,
        namespace: &str,
        name: &str,
        policy: &DeletePolicy,
    ) -> ConnectorResult<()>;

    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> ConnectorResult<Deployment>;

    async fn pod_logs(
        &self,
        namespace: &str,
        pod_name: &str,
        options: &LogOptions,
    ) -> ConnectorResult<String>;
}

/// [`ClusterApi`] backed by a live API server
#[derive(Debug, Clone)]
pub struct KubeCluster {
    client: K8sClient,
}

impl KubeCluster {
    pub fn new(client: K8sClient) -> Self {
        Self { client }
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.inner().clone(), namespace)
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn list_pods(&self, namespace: &str, options: &ListOptions) -> ConnectorResult<Vec<Pod>> {
        let pods: Api<Pod> = self.api(namespace);
        let list = pods
            .list(&options.to_params())
            .await
            .map_err(ConnectorError::cluster("list_pods"))?;

        Ok(list.items)
    }

    async fn list_services(
        &self,
        namespace: &str,
        options: &ListOptions,
    ) -> ConnectorResult<Vec<Service>> {
        let services: Api<Service> = self.api(namespace);
        let list = services
            .list(&options.to_params())
            .await
            .map_err(ConnectorError::cluster("list_services"))?;

        Ok(list.items)
    }

    async fn list_deployments(
        &self,
        namespace: &str,
        options: &ListOptions,
    ) -> ConnectorResult<Vec<Deployment>> {
        let deployments: Api<Deployment> = self.api(namespace);
        let list = deployments
            .list(&options.to_params())
            .await
            .map_err(ConnectorError::cluster("list_deployments"))?;

        Ok(list.items)
    }

    async fn replace_deployment(
        &self,
        namespace: &str,
        name: &str,
        deployment: &Deployment,
    ) -> ConnectorResult<Deployment> {
        let deployments: Api<Deployment> = self.api(namespace);
        deployments
            .replace(name, &PostParams::default(), deployment)
            .await
            .map_err(ConnectorError::cluster("replace_deployment"))
    }

    async fn delete_deployment(
        &self,
        namespace: &str,
        name: &str,
        policy: &DeletePolicy,
    ) -> ConnectorResult<()> {
        if policy.orphan_dependents && policy.background_propagation {
            tracing::debug!(
                namespace = %namespace,
                name = %name,
                "orphanDependents not sent alongside background propagation"
            );
        }

        let deployments: Api<Deployment> = self.api(namespace);
        deployments
            .delete(name, &policy.to_params())
            .await
            .map_err(ConnectorError::cluster("delete_deployment"))?;

        Ok(())
    }

    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> ConnectorResult<Deployment> {
        let deployments: Api<Deployment> = self.api(namespace);
        deployments
            .create(&PostParams::default(), deployment)
            .await
            .map_err(ConnectorError::cluster("create_deployment"))
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        pod_name: &str,
        options: &LogOptions,
    ) -> ConnectorResult<String> {
        let pods: Api<Pod> = self.api(namespace);
        pods.logs(pod_name, &options.to_params())
            .await
            .map_err(ConnectorError::cluster("pod_logs"))
    }
}
