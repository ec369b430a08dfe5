//! Common types and utilities shared between kubelink-api and kubelink-cli
//!
//! Data shapes describe the rows a caller wants back, primitives are the
//! coerced cell values, and info tables carry the projected result.

pub mod catalog;
pub mod shape;
pub mod table;
pub mod value;

pub use catalog::{CatalogError, DataShapeCatalog, SchemaResolver};
pub use shape::{BaseType, DataShape, FieldDefinition};
pub use table::{InfoTable, Row, TableError};
pub use value::{coerce, CoercionError, Primitive, SourceValue};
