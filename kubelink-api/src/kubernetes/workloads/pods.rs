//! Pod listing

use kubelink_common::{DataShape, InfoTable};

use crate::kubernetes::cluster::ClusterApi;
use crate::kubernetes::error::ConnectorResult;
use crate::kubernetes::reader;
use crate::kubernetes::types::ListOptions;

/// List pods in a namespace as rows of `shape`
pub async fn list_pods(
    cluster: &dyn ClusterApi,
    namespace: &str,
    shape: &DataShape,
    options: &ListOptions,
) -> ConnectorResult<InfoTable> {
    tracing::debug!(namespace = %namespace, limit = options.limit, timeout = options.timeout_secs, "Listing pods");
    reader::read(shape, || cluster.list_pods(namespace, options)).await
}
