//! Pod log retrieval
//!
//! One bounded, non-following request. Unlike the mutating operations, a
//! cluster failure here is returned to the caller.

use crate::kubernetes::cluster::ClusterApi;
use crate::kubernetes::error::ConnectorResult;
use crate::kubernetes::types::LogOptions;

/// Get the most recent log lines of a pod
pub async fn get_pod_logs(
    cluster: &dyn ClusterApi,
    namespace: &str,
    pod_name: &str,
    options: &LogOptions,
) -> ConnectorResult<String> {
    tracing::debug!(
        namespace = %namespace,
        pod = %pod_name,
        tail_lines = options.tail_lines,
        "Fetching pod logs"
    );

    match cluster.pod_logs(namespace, pod_name, options).await {
        Ok(logs) => Ok(logs),
        Err(e) => {
            tracing::warn!(namespace = %namespace, pod = %pod_name, "Log request failed: {}", e);
            Err(e)
        }
    }
}
