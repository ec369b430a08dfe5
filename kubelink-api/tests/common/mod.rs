//! Common test utilities and helpers
//!
//! An in-memory cluster that records every request, and a provisioner that
//! counts how often it was asked for a handle.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, Pod, PodSpec, PodStatus, PodTemplateSpec, Service, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::error::ErrorResponse;

use kubelink_api::kubernetes::{DeletePolicy, ListOptions, LogOptions};
use kubelink_api::{
    ClusterApi, ClusterProvisioner, ConnectionSettings, ConnectorConfig, ConnectorError,
    ConnectorResult, KubeConnector,
};
use kubelink_common::{BaseType, DataShape, DataShapeCatalog};

/// One request received by the fake cluster
#[derive(Debug, Clone)]
pub enum Call {
    ListPods { namespace: String, options: ListOptions },
    ListServices { namespace: String, options: ListOptions },
    ListDeployments { namespace: String },
    Replace { namespace: String, name: String, deployment: Deployment },
    Delete { namespace: String, name: String, policy: DeletePolicy },
    Create { namespace: String, deployment: Deployment },
    Logs { namespace: String, pod: String, options: LogOptions },
}

#[derive(Default)]
struct State {
    pods: Vec<Pod>,
    services: Vec<Service>,
    deployments: Vec<Deployment>,
    logs: HashMap<String, String>,
    failing: HashSet<&'static str>,
    calls: Vec<Call>,
}

/// In-memory cluster; clones share state
#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
}

fn api_error(operation: &'static str, code: u16, reason: &str) -> ConnectorError {
    ConnectorError::ClusterRequest {
        operation,
        source: kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("{} rejected", operation),
            reason: reason.to_string(),
            code,
        }),
    }
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pod(self, pod: Pod) -> Self {
        self.state.lock().unwrap().pods.push(pod);
        self
    }

    pub fn with_service(self, service: Service) -> Self {
        self.state.lock().unwrap().services.push(service);
        self
    }

    pub fn with_deployment(self, deployment: Deployment) -> Self {
        self.state.lock().unwrap().deployments.push(deployment);
        self
    }

    pub fn with_logs(self, pod: &str, logs: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .logs
            .insert(pod.to_string(), logs.to_string());
        self
    }

    /// Make every call of `operation` fail with a server error
    pub fn failing(self, operation: &'static str) -> Self {
        self.state.lock().unwrap().failing.insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    fn record(&self, operation: &'static str, call: Call) -> ConnectorResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing.contains(operation) {
            return Err(api_error(operation, 500, "InternalError"));
        }
        Ok(())
    }

    fn in_namespace<T: kube::Resource>(items: &[T], namespace: &str) -> Vec<T>
    where
        T: Clone,
    {
        items
            .iter()
            .filter(|item| item.meta().namespace.as_deref() == Some(namespace))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn list_pods(&self, namespace: &str, options: &ListOptions) -> ConnectorResult<Vec<Pod>> {
        self.record(
            "list_pods",
            Call::ListPods {
                namespace: namespace.to_string(),
                options: options.clone(),
            },
        )?;
        Ok(Self::in_namespace(&self.state.lock().unwrap().pods, namespace))
    }

    async fn list_services(
        &self,
        namespace: &str,
        options: &ListOptions,
    ) -> ConnectorResult<Vec<Service>> {
        self.record(
            "list_services",
            Call::ListServices {
                namespace: namespace.to_string(),
                options: options.clone(),
            },
        )?;
        Ok(Self::in_namespace(&self.state.lock().unwrap().services, namespace))
    }

    async fn list_deployments(
        &self,
        namespace: &str,
        _options: &ListOptions,
    ) -> ConnectorResult<Vec<Deployment>> {
        self.record(
            "list_deployments",
            Call::ListDeployments {
                namespace: namespace.to_string(),
            },
        )?;
        Ok(Self::in_namespace(&self.state.lock().unwrap().deployments, namespace))
    }

    async fn replace_deployment(
        &self,
        namespace: &str,
        name: &str,
        deployment: &Deployment,
    ) -> ConnectorResult<Deployment> {
        self.record(
            "replace_deployment",
            Call::Replace {
                namespace: namespace.to_string(),
                name: name.to_string(),
                deployment: deployment.clone(),
            },
        )?;
        Ok(deployment.clone())
    }

    async fn delete_deployment(
        &self,
        namespace: &str,
        name: &str,
        policy: &DeletePolicy,
    ) -> ConnectorResult<()> {
        self.record(
            "delete_deployment",
            Call::Delete {
                namespace: namespace.to_string(),
                name: name.to_string(),
                policy: policy.clone(),
            },
        )
    }

    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> ConnectorResult<Deployment> {
        self.record(
            "create_deployment",
            Call::Create {
                namespace: namespace.to_string(),
                deployment: deployment.clone(),
            },
        )?;
        Ok(deployment.clone())
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        pod_name: &str,
        options: &LogOptions,
    ) -> ConnectorResult<String> {
        self.record(
            "pod_logs",
            Call::Logs {
                namespace: namespace.to_string(),
                pod: pod_name.to_string(),
                options: options.clone(),
            },
        )?;
        self.state
            .lock()
            .unwrap()
            .logs
            .get(pod_name)
            .cloned()
            .ok_or_else(|| api_error("pod_logs", 404, "NotFound"))
    }
}

/// Hands out the same fake cluster and counts provisioning requests
#[derive(Clone, Default)]
pub struct FakeProvisioner {
    cluster: FakeCluster,
    provisions: Arc<AtomicUsize>,
    refuse: bool,
}

impl FakeProvisioner {
    pub fn new(cluster: FakeCluster) -> Self {
        Self {
            cluster,
            ..Default::default()
        }
    }

    /// A provisioner whose endpoint is unreachable
    pub fn unreachable() -> Self {
        Self {
            refuse: true,
            ..Default::default()
        }
    }

    pub fn provisions(&self) -> usize {
        self.provisions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterProvisioner for FakeProvisioner {
    type Cluster = FakeCluster;

    async fn provision(&self, settings: &ConnectionSettings) -> ConnectorResult<FakeCluster> {
        self.provisions.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(ConnectorError::Connection(format!(
                "{}:{} refused the connection",
                settings.server_name, settings.server_port
            )));
        }
        Ok(self.cluster.clone())
    }
}

// ============== Fixtures ==============

pub fn catalog() -> DataShapeCatalog {
    DataShapeCatalog::new()
        .with_shape(
            DataShape::new("PodShape")
                .with_field("podName", BaseType::String)
                .with_field("podStatus", BaseType::String),
        )
        .and_then(|c| {
            c.with_shape(
                DataShape::new("PodNetworkShape")
                    .with_field("podName", BaseType::String)
                    .with_field("namespace", BaseType::String)
                    .with_field("hostIP", BaseType::String)
                    .with_field("podIP", BaseType::String)
                    .with_field("owner", BaseType::String),
            )
        })
        .and_then(|c| {
            c.with_shape(
                DataShape::new("PodTypedShape")
                    .with_field("podName", BaseType::String)
                    .with_field("podIP", BaseType::Number),
            )
        })
        .and_then(|c| {
            c.with_shape(DataShape::new("ServiceShape").with_field("serviceName", BaseType::String))
        })
        .unwrap()
}

pub fn connector(cluster: FakeCluster) -> (KubeConnector<FakeProvisioner>, FakeProvisioner) {
    connector_with(ConnectorConfig::default(), FakeProvisioner::new(cluster))
}

pub fn connector_with(
    config: ConnectorConfig,
    provisioner: FakeProvisioner,
) -> (KubeConnector<FakeProvisioner>, FakeProvisioner) {
    let handle = provisioner.clone();
    (
        KubeConnector::new(config, Arc::new(catalog()), provisioner),
        handle,
    )
}

pub fn pod(namespace: &str, name: &str, phase: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        status: Some(PodStatus {
            phase: Some(phase.to_string()),
            host_ip: Some("192.168.1.20".to_string()),
            pod_ip: Some("10.42.0.7".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn service(namespace: &str, name: &str) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            cluster_ip: Some("10.43.0.10".to_string()),
            type_: Some("ClusterIP".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn deployment(namespace: &str, name: &str, replicas: i32) -> Deployment {
    let labels = std::collections::BTreeMap::from([("app".to_string(), name.to_string())]);

    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            resource_version: Some("1001".to_string()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            revision_history_limit: Some(4),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: name.to_string(),
                        image: Some(format!("registry.local/{}:2.0", name)),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        status: None,
    }
}
