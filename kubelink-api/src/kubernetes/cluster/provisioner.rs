//! Connection provisioning
//!
//! Turns connection settings into a cluster handle. The connector asks its
//! provisioner for a fresh handle on every operation.

use async_trait::async_trait;

use super::api::{ClusterApi, KubeCluster};
use crate::config::ConnectionSettings;
use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::{ConnectorError, ConnectorResult};

/// Creates cluster handles from connection settings
#[async_trait]
pub trait ClusterProvisioner: Send + Sync {
    type Cluster: ClusterApi + 'static;

    async fn provision(&self, settings: &ConnectionSettings) -> ConnectorResult<Self::Cluster>;
}

/// Provisioner for live clusters
#[derive(Debug, Clone, Default)]
pub struct KubeProvisioner;

impl KubeProvisioner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClusterProvisioner for KubeProvisioner {
    type Cluster = KubeCluster;

    async fn provision(&self, settings: &ConnectionSettings) -> ConnectorResult<KubeCluster> {
        let client = K8sClient::connect(settings).await?;

        if settings.verify_on_connect {
            let version = client.get_version().await.map_err(|e| {
                ConnectorError::Connection(format!(
                    "API server {} unreachable: {}",
                    client.api_server(),
                    e
                ))
            })?;
            tracing::debug!(api_server = %client.api_server(), version = %version, "Cluster reachable");
        }

        Ok(KubeCluster::new(client))
    }
}
