//! Info tables
//!
//! Rows are created from a data shape and carry exactly one cell per field,
//! so a table's columns always match its shape.

use crate::shape::DataShape;
use crate::value::Primitive;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Field '{0}' is not part of data shape '{1}'")]
    UnknownField(String, String),

    #[error("Row columns do not match data shape '{0}'")]
    ShapeMismatch(String),
}

/// One table row, cells ordered as the shape's fields
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<(String, Option<Primitive>)>,
}

impl Row {
    /// Create a row with every field of `shape` unset
    pub fn for_shape(shape: &DataShape) -> Self {
        Self {
            cells: shape.fields.iter().map(|f| (f.name.clone(), None)).collect(),
        }
    }

    /// Set a cell; returns false when the row has no such column
    pub fn set(&mut self, field: &str, value: Primitive) -> bool {
        match self.cells.iter_mut().find(|(name, _)| name == field) {
            Some((_, cell)) => {
                *cell = Some(value);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Primitive> {
        self.cells
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, cell)| cell.as_ref())
    }

    pub fn has_column(&self, field: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == field)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, Option<&Primitive>)> {
        self.cells.iter().map(|(name, cell)| (name.as_str(), cell.as_ref()))
    }

    /// Number of cells holding a value
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|(_, cell)| cell.is_some()).count()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, cell) in &self.cells {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

/// Result table bound to a data shape
#[derive(Debug, Clone, PartialEq)]
pub struct InfoTable {
    shape: DataShape,
    rows: Vec<Row>,
}

impl InfoTable {
    pub fn new(shape: DataShape) -> Self {
        Self {
            shape,
            rows: Vec::new(),
        }
    }

    pub fn shape(&self) -> &DataShape {
        &self.shape
    }

    /// Start a row for this table's shape
    pub fn new_row(&self) -> Row {
        Row::for_shape(&self.shape)
    }

    pub fn add_row(&mut self, row: Row) -> Result<(), TableError> {
        if !row.columns().eq(self.shape.field_names()) {
            return Err(TableError::ShapeMismatch(self.shape.name.clone()));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for InfoTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("InfoTable", 3)?;
        state.serialize_field("dataShape", &self.shape.name)?;
        state.serialize_field("fields", &self.shape.fields)?;
        state.serialize_field("rows", &self.rows)?;
        state.end()
    }
}
