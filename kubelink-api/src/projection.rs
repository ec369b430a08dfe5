//! Row projection
//!
//! Each resource kind publishes a table from field name to extractor. A
//! [`ProjectionPlan`] binds a data shape against that table once, then turns
//! every source object into a row with exactly the shape's columns.

use k8s_openapi::api::core::v1::{Pod, Service};
use kubelink_common::{coerce, BaseType, CoercionError, DataShape, Row, SourceValue};

use crate::kubernetes::types::ResourceKind;

/// Pulls one attribute out of a source object
pub type Extractor<K> = fn(&K) -> Option<SourceValue>;

/// A source object kind that can be projected into rows
pub trait Projectable: Sized + 'static {
    const KIND: ResourceKind;

    /// Field name to extractor table for this kind
    fn extractors() -> &'static [(&'static str, Extractor<Self>)];

    fn extractor(field: &str) -> Option<Extractor<Self>> {
        Self::extractors()
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, extractor)| *extractor)
    }

    fn supported_fields() -> Vec<&'static str> {
        Self::extractors().iter().map(|(name, _)| *name).collect()
    }
}

struct Binding<K> {
    field: String,
    base_type: BaseType,
    extractor: Option<Extractor<K>>,
}

/// A data shape bound to one resource kind's extractors
pub struct ProjectionPlan<K: Projectable> {
    shape: DataShape,
    bindings: Vec<Binding<K>>,
}

/// A projected row and the coercion failures met while building it
#[derive(Debug, Clone)]
pub struct ProjectedRow {
    pub row: Row,
    pub issues: Vec<(String, CoercionError)>,
}

impl ProjectedRow {
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

impl<K: Projectable> ProjectionPlan<K> {
    pub fn bind(shape: &DataShape) -> Self {
        let bindings = shape
            .fields
            .iter()
            .map(|field| Binding {
                field: field.name.clone(),
                base_type: field.base_type,
                extractor: K::extractor(&field.name),
            })
            .collect();

        Self {
            shape: shape.clone(),
            bindings,
        }
    }

    pub fn shape(&self) -> &DataShape {
        &self.shape
    }

    /// Shape fields with no attribute on this kind; always left unset
    pub fn unbound_fields(&self) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|b| b.extractor.is_none())
            .map(|b| b.field.as_str())
            .collect()
    }

    pub fn project(&self, source: &K) -> ProjectedRow {
        let mut row = Row::for_shape(&self.shape);
        let mut issues = Vec::new();

        for binding in &self.bindings {
            let Some(value) = binding.extractor.and_then(|extract| extract(source)) else {
                continue;
            };

            match coerce(&value, binding.base_type) {
                Ok(primitive) => {
                    row.set(&binding.field, primitive);
                }
                Err(e) => issues.push((binding.field.clone(), e)),
            }
        }

        ProjectedRow { row, issues }
    }
}

fn text(value: Option<&String>) -> Option<SourceValue> {
    value.map(|s| SourceValue::Text(s.clone()))
}

const POD_FIELDS: &[(&str, Extractor<Pod>)] = &[
    ("podName", |p| text(p.metadata.name.as_ref())),
    ("podStatus", |p| text(p.status.as_ref().and_then(|s| s.phase.as_ref()))),
    ("namespace", |p| text(p.metadata.namespace.as_ref())),
    ("hostIP", |p| text(p.status.as_ref().and_then(|s| s.host_ip.as_ref()))),
    ("podIP", |p| text(p.status.as_ref().and_then(|s| s.pod_ip.as_ref()))),
    ("nodeName", |p| text(p.spec.as_ref().and_then(|s| s.node_name.as_ref()))),
    ("startTime", |p| {
        p.status
            .as_ref()
            .and_then(|s| s.start_time.as_ref())
            .map(|t| SourceValue::Timestamp(t.0))
    }),
    ("restartCount", |p| {
        p.status
            .as_ref()
            .and_then(|s| s.container_statuses.as_ref())
            .map(|statuses| SourceValue::Int(statuses.iter().map(|c| i64::from(c.restart_count)).sum()))
    }),
];

const SERVICE_FIELDS: &[(&str, Extractor<Service>)] = &[
    ("serviceName", |s| text(s.metadata.name.as_ref())),
    ("namespace", |s| text(s.metadata.namespace.as_ref())),
    ("serviceType", |s| text(s.spec.as_ref().and_then(|spec| spec.type_.as_ref()))),
    ("clusterIP", |s| text(s.spec.as_ref().and_then(|spec| spec.cluster_ip.as_ref()))),
];

impl Projectable for Pod {
    const KIND: ResourceKind = ResourceKind::Pod;

    fn extractors() -> &'static [(&'static str, Extractor<Self>)] {
        POD_FIELDS
    }
}

impl Projectable for Service {
    const KIND: ResourceKind = ResourceKind::Service;

    fn extractors() -> &'static [(&'static str, Extractor<Self>)] {
        SERVICE_FIELDS
    }
}
