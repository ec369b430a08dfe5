//! Data shape definitions
//!
//! A data shape is an ordered list of named, typed fields. The connector never
//! defines shapes itself; it receives them resolved from a catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primitive base types a field can declare
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum BaseType {
    String,
    Text,
    Number,   // f64
    Integer,  // i32
    Long,     // i64
    Boolean,
    DateTime, // UTC timestamp
    Json,
}

impl BaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseType::String => "STRING",
            BaseType::Text => "TEXT",
            BaseType::Number => "NUMBER",
            BaseType::Integer => "INTEGER",
            BaseType::Long => "LONG",
            BaseType::Boolean => "BOOLEAN",
            BaseType::DateTime => "DATETIME",
            BaseType::Json => "JSON",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STRING" => Ok(BaseType::String),
            "TEXT" => Ok(BaseType::Text),
            "NUMBER" => Ok(BaseType::Number),
            "INTEGER" => Ok(BaseType::Integer),
            "LONG" => Ok(BaseType::Long),
            "BOOLEAN" => Ok(BaseType::Boolean),
            "DATETIME" => Ok(BaseType::DateTime),
            "JSON" => Ok(BaseType::Json),
            other => Err(format!("Unknown base type: {}", other)),
        }
    }
}

/// One named, typed field of a data shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub base_type: BaseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, base_type: BaseType) -> Self {
        Self {
            name: name.into(),
            base_type,
            description: None,
        }
    }
}

/// Ordered row schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataShape {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl DataShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field, keeping declaration order
    pub fn with_field(mut self, name: impl Into<String>, base_type: BaseType) -> Self {
        self.fields.push(FieldDefinition::new(name, base_type));
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Name of the first field declared twice, if any
    pub fn duplicate_field(&self) -> Option<&str> {
        self.fields.iter().enumerate().find_map(|(i, f)| {
            self.fields[..i]
                .iter()
                .any(|earlier| earlier.name == f.name)
                .then_some(f.name.as_str())
        })
    }
}
