//! Data shape resolution
//!
//! The connector looks shapes up by name through [`SchemaResolver`]. The
//! TOML-backed [`DataShapeCatalog`] stands in for the platform's registry.
//!
//! ```toml
//! [[data_shape]]
//! name = "PodShape"
//!
//! [[data_shape.fields]]
//! name = "podName"
//! base_type = "STRING"
//! ```

use crate::shape::DataShape;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Resolves a caller-referenced data shape name
pub trait SchemaResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<DataShape>;
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {0}: {1}")]
    FileRead(PathBuf, String),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Data shape name cannot be empty")]
    EmptyName,

    #[error("Data shape '{0}' is defined more than once")]
    DuplicateShape(String),

    #[error("Data shape '{0}' declares field '{1}' more than once")]
    DuplicateField(String, String),
}

/// In-memory set of data shapes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataShapeCatalog {
    #[serde(default, rename = "data_shape")]
    shapes: Vec<DataShape>,
}

impl DataShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::FileRead(path.to_path_buf(), e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: DataShapeCatalog =
            toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut catalog = Self::new();
        for shape in parsed.shapes {
            catalog.insert(shape)?;
        }
        Ok(catalog)
    }

    /// Register a shape, rejecting duplicate names and fields
    pub fn insert(&mut self, shape: DataShape) -> Result<(), CatalogError> {
        if shape.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if let Some(field) = shape.duplicate_field() {
            return Err(CatalogError::DuplicateField(
                shape.name.clone(),
                field.to_string(),
            ));
        }
        if self.shapes.iter().any(|s| s.name == shape.name) {
            return Err(CatalogError::DuplicateShape(shape.name));
        }

        self.shapes.push(shape);
        Ok(())
    }

    pub fn with_shape(mut self, shape: DataShape) -> Result<Self, CatalogError> {
        self.insert(shape)?;
        Ok(self)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl SchemaResolver for DataShapeCatalog {
    fn resolve(&self, name: &str) -> Option<DataShape> {
        self.shapes.iter().find(|s| s.name == name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::BaseType;
    use std::io::Write;

    const CATALOG: &str = r#"
[[data_shape]]
name = "PodShape"

[[data_shape.fields]]
name = "podName"
base_type = "STRING"

[[data_shape.fields]]
name = "restartCount"
base_type = "INTEGER"
description = "Container restarts"

[[data_shape]]
name = "ServiceShape"
fields = [{ name = "serviceName", base_type = "STRING" }]
"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = DataShapeCatalog::from_toml_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let pods = catalog.resolve("PodShape").unwrap();
        assert_eq!(pods.fields.len(), 2);
        assert_eq!(pods.fields[1].base_type, BaseType::Integer);
        assert!(catalog.resolve("NodeShape").is_none());
    }

    #[test]
    fn test_rejects_duplicate_shapes() {
        let shape = DataShape::new("PodShape").with_field("podName", BaseType::String);
        let result = DataShapeCatalog::new()
            .with_shape(shape.clone())
            .unwrap()
            .with_shape(shape);

        assert!(matches!(result, Err(CatalogError::DuplicateShape(name)) if name == "PodShape"));
    }

    #[test]
    fn test_rejects_duplicate_fields() {
        let shape = DataShape::new("PodShape")
            .with_field("podName", BaseType::String)
            .with_field("podName", BaseType::Text);

        let err = DataShapeCatalog::new().insert(shape).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateField(_, field) if field == "podName"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = DataShapeCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["PodShape", "ServiceShape"]);
    }

    #[test]
    fn test_unknown_base_type_fails_parse() {
        let broken = r#"
[[data_shape]]
name = "Bad"
fields = [{ name = "x", base_type = "VARCHAR" }]
"#;
        assert!(matches!(
            DataShapeCatalog::from_toml_str(broken),
            Err(CatalogError::Parse(_))
        ));
    }
}
