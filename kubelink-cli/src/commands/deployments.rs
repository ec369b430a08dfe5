//! Deployment commands

use std::path::Path;

use anyhow::Result;
use kubelink_api::KubeConnector;

use crate::output::{self, OutputFormat};

pub async fn scale(
    connector: &KubeConnector,
    namespace: Option<&str>,
    name: &str,
    replicas: &str,
    format: OutputFormat,
) -> Result<()> {
    let outcome = connector.scale_deployment(namespace, name, replicas).await?;
    output::print_outcome(&format!("scale {} to {}", name, replicas), &outcome, format)
}

pub async fn delete(
    connector: &KubeConnector,
    namespace: Option<&str>,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    let outcome = connector.delete_extension_deployment(namespace, name).await?;
    output::print_outcome(&format!("delete {}", name), &outcome, format)
}

pub async fn create(
    connector: &KubeConnector,
    namespace: Option<&str>,
    manifest: Option<&Path>,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    let outcome = connector.create_deployment(namespace, manifest, name).await?;
    output::print_outcome(&format!("create {}", name), &outcome, format)
}
