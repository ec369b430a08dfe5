//! Deployment lifecycle
//!
//! Scale and delete both list the namespace's deployments, pick the first
//! exact name match, then act on it. Failures never propagate: they are
//! logged and returned as a [`MutationOutcome`].

use k8s_openapi::api::apps::v1::Deployment;

use crate::kubernetes::cluster::ClusterApi;
use crate::kubernetes::error::ConnectorResult;
use crate::kubernetes::types::{DeletePolicy, ListOptions, MutationOutcome, ResourceRef, ScaleRequest};
use crate::log_cluster_operation;

/// Find a deployment by exact name in the target's namespace
pub async fn find_deployment(
    cluster: &dyn ClusterApi,
    target: &ResourceRef,
    options: &ListOptions,
) -> ConnectorResult<Option<Deployment>> {
    let deployments = cluster.list_deployments(&target.namespace, options).await?;

    Ok(deployments
        .into_iter()
        .find(|d| d.metadata.name.as_deref() == Some(target.name.as_str())))
}

/// Copy a deployment with only its replica count changed
pub fn with_replicas(existing: &Deployment, replicas: i32) -> Deployment {
    let mut scaled = Deployment {
        metadata: existing.metadata.clone(),
        spec: existing.spec.clone(),
        status: None,
    };
    scaled.spec.get_or_insert_with(Default::default).replicas = Some(replicas);
    scaled
}

/// Scale a deployment by replacing it with an updated replica count
pub async fn scale_deployment(
    cluster: &dyn ClusterApi,
    request: &ScaleRequest,
    options: &ListOptions,
) -> MutationOutcome {
    let target = &request.target;

    let existing = match lookup(cluster, target, options).await {
        Ok(deployment) => deployment,
        Err(outcome) => return outcome,
    };

    let scaled = with_replicas(&existing, request.replicas);
    match cluster
        .replace_deployment(&target.namespace, &target.name, &scaled)
        .await
    {
        Ok(_) => {
            log_cluster_operation!(
                "scale_deployment",
                target.namespace,
                target.name,
                replicas = request.replicas
            );
            MutationOutcome::Applied
        }
        Err(e) => {
            tracing::warn!(deployment = %target, "Scale request failed: {}", e);
            MutationOutcome::Failed(e.to_string())
        }
    }
}

/// Delete a deployment with the given policy
pub async fn delete_deployment(
    cluster: &dyn ClusterApi,
    target: &ResourceRef,
    policy: &DeletePolicy,
    options: &ListOptions,
) -> MutationOutcome {
    if let Err(outcome) = lookup(cluster, target, options).await {
        return outcome;
    }

    match cluster
        .delete_deployment(&target.namespace, &target.name, policy)
        .await
    {
        Ok(()) => {
            log_cluster_operation!(
                "delete_deployment",
                target.namespace,
                target.name,
                grace_period_seconds = policy.grace_period_seconds
            );
            MutationOutcome::Applied
        }
        Err(e) => {
            tracing::warn!(deployment = %target, "Delete request failed: {}", e);
            MutationOutcome::Failed(e.to_string())
        }
    }
}

/// Find step shared by scale and delete; `Err` carries the early outcome
async fn lookup(
    cluster: &dyn ClusterApi,
    target: &ResourceRef,
    options: &ListOptions,
) -> Result<Deployment, MutationOutcome> {
    match find_deployment(cluster, target, options).await {
        Ok(Some(deployment)) => Ok(deployment),
        Ok(None) => {
            tracing::warn!(deployment = %target, "Deployment not found, nothing to do");
            Err(MutationOutcome::NotFound)
        }
        Err(e) => {
            tracing::warn!(deployment = %target, "Listing deployments failed: {}", e);
            Err(MutationOutcome::Failed(e.to_string()))
        }
    }
}
