//! Resource reader
//!
//! Lists one kind of resource and projects every item, in server order, into
//! an info table. A failed list call fails the whole read; coercion issues
//! only leave cells unset.

use std::future::Future;

use kubelink_common::{DataShape, InfoTable};

use super::error::{ConnectorError, ConnectorResult};
use crate::projection::{ProjectedRow, Projectable, ProjectionPlan};

/// Bind `shape`, run the list call, and project its items
pub async fn read<K, F, Fut>(shape: &DataShape, list: F) -> ConnectorResult<InfoTable>
where
    K: Projectable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = ConnectorResult<Vec<K>>>,
{
    let plan = ProjectionPlan::<K>::bind(shape);
    let unbound = plan.unbound_fields();
    if !unbound.is_empty() {
        tracing::debug!(
            kind = %K::KIND,
            shape = %shape.name,
            fields = ?unbound,
            "Fields with no source attribute stay unset"
        );
    }

    let items = list().await?;
    project_all(&plan, &items)
}

/// Project items in order into a table for the plan's shape
pub fn project_all<K: Projectable>(
    plan: &ProjectionPlan<K>,
    items: &[K],
) -> ConnectorResult<InfoTable> {
    let mut table = InfoTable::new(plan.shape().clone());

    for (index, item) in items.iter().enumerate() {
        let ProjectedRow { row, issues } = plan.project(item);
        for (field, issue) in issues {
            let error = ConnectorError::from(issue);
            tracing::warn!(
                kind = %K::KIND,
                row = index,
                field = %field,
                error_kind = ?error.kind(),
                "{}",
                error
            );
        }
        table.add_row(row)?;
    }

    tracing::info!(
        kind = %K::KIND,
        shape = %plan.shape().name,
        rows = table.len(),
        "Listed resources"
    );

    Ok(table)
}
