//! Pod, service and log commands

use anyhow::Result;
use kubelink_api::KubeConnector;

use crate::output::{self, OutputFormat};

pub async fn list_pods(
    connector: &KubeConnector,
    namespace: Option<&str>,
    shape: &str,
    format: OutputFormat,
) -> Result<()> {
    let table = connector.list_pods(namespace, shape).await?;
    output::print_info_table(&table, format)
}

pub async fn list_services(
    connector: &KubeConnector,
    namespace: Option<&str>,
    shape: &str,
    format: OutputFormat,
) -> Result<()> {
    let table = connector.list_services(namespace, shape).await?;
    output::print_info_table(&table, format)
}

pub async fn pod_logs(connector: &KubeConnector, namespace: Option<&str>, pod: &str) -> Result<()> {
    let logs = connector.get_pod_logs(namespace, pod).await?;
    print!("{}", logs);
    Ok(())
}
