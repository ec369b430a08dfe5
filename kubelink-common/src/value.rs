//! Primitive values and type coercion
//!
//! Source attributes pulled from cluster objects arrive as a [`SourceValue`]
//! and are converted to the [`Primitive`] a field declares.

use crate::shape::BaseType;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

/// Raw attribute value extracted from a source object
#[derive(Debug, Clone, PartialEq)]
pub enum SourceValue {
    Text(String),
    Int(i64),
    Flag(bool),
    Timestamp(DateTime<Utc>),
}

impl SourceValue {
    fn describe(&self) -> String {
        match self {
            SourceValue::Text(s) => format!("\"{}\"", s),
            SourceValue::Int(i) => i.to_string(),
            SourceValue::Flag(b) => b.to_string(),
            SourceValue::Timestamp(t) => t.to_rfc3339(),
        }
    }
}

impl From<String> for SourceValue {
    fn from(s: String) -> Self {
        SourceValue::Text(s)
    }
}

impl From<&str> for SourceValue {
    fn from(s: &str) -> Self {
        SourceValue::Text(s.to_string())
    }
}

/// Typed cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Primitive {
    String(String),
    Number(f64),
    Integer(i32),
    Long(i64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Json(serde_json::Value),
}

impl Primitive {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value for plain-text output
    pub fn to_display_string(&self) -> String {
        match self {
            Primitive::String(s) => s.clone(),
            Primitive::Number(n) => n.to_string(),
            Primitive::Integer(i) => i.to_string(),
            Primitive::Long(l) => l.to_string(),
            Primitive::Boolean(b) => b.to_string(),
            Primitive::DateTime(t) => t.to_rfc3339(),
            Primitive::Json(v) => v.to_string(),
        }
    }
}

/// A value could not be converted to the declared base type
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Cannot convert {value} to {target}: {reason}")]
pub struct CoercionError {
    pub value: String,
    pub target: BaseType,
    pub reason: String,
}

impl CoercionError {
    fn new(value: &SourceValue, target: BaseType, reason: impl Into<String>) -> Self {
        Self {
            value: value.describe(),
            target,
            reason: reason.into(),
        }
    }
}

/// Convert a source attribute to the primitive a field declares
pub fn coerce(value: &SourceValue, target: BaseType) -> Result<Primitive, CoercionError> {
    match target {
        BaseType::String | BaseType::Text => Ok(Primitive::String(match value {
            SourceValue::Text(s) => s.clone(),
            SourceValue::Int(i) => i.to_string(),
            SourceValue::Flag(b) => b.to_string(),
            SourceValue::Timestamp(t) => t.to_rfc3339(),
        })),
        BaseType::Number => match value {
            SourceValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Primitive::Number)
                .map_err(|e| CoercionError::new(value, target, e.to_string())),
            SourceValue::Int(i) => Ok(Primitive::Number(*i as f64)),
            SourceValue::Flag(b) => Ok(Primitive::Number(if *b { 1.0 } else { 0.0 })),
            SourceValue::Timestamp(t) => Ok(Primitive::Number(t.timestamp_millis() as f64)),
        },
        BaseType::Integer => match value {
            SourceValue::Text(s) => s
                .trim()
                .parse::<i32>()
                .map(Primitive::Integer)
                .map_err(|e| CoercionError::new(value, target, e.to_string())),
            SourceValue::Int(i) => i32::try_from(*i)
                .map(Primitive::Integer)
                .map_err(|_| CoercionError::new(value, target, "out of range")),
            SourceValue::Flag(b) => Ok(Primitive::Integer(i32::from(*b))),
            SourceValue::Timestamp(_) => {
                Err(CoercionError::new(value, target, "timestamps do not fit in 32 bits"))
            }
        },
        BaseType::Long => match value {
            SourceValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(Primitive::Long)
                .map_err(|e| CoercionError::new(value, target, e.to_string())),
            SourceValue::Int(i) => Ok(Primitive::Long(*i)),
            SourceValue::Flag(b) => Ok(Primitive::Long(i64::from(*b))),
            SourceValue::Timestamp(t) => Ok(Primitive::Long(t.timestamp_millis())),
        },
        BaseType::Boolean => match value {
            SourceValue::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" => Ok(Primitive::Boolean(true)),
                "false" => Ok(Primitive::Boolean(false)),
                _ => Err(CoercionError::new(value, target, "expected true or false")),
            },
            SourceValue::Int(i) => Ok(Primitive::Boolean(*i != 0)),
            SourceValue::Flag(b) => Ok(Primitive::Boolean(*b)),
            SourceValue::Timestamp(_) => {
                Err(CoercionError::new(value, target, "timestamps are not booleans"))
            }
        },
        BaseType::DateTime => match value {
            SourceValue::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|t| Primitive::DateTime(t.with_timezone(&Utc)))
                .map_err(|e| CoercionError::new(value, target, e.to_string())),
            SourceValue::Int(millis) => Utc
                .timestamp_millis_opt(*millis)
                .single()
                .map(Primitive::DateTime)
                .ok_or_else(|| CoercionError::new(value, target, "out of range")),
            SourceValue::Flag(_) => {
                Err(CoercionError::new(value, target, "booleans are not timestamps"))
            }
            SourceValue::Timestamp(t) => Ok(Primitive::DateTime(*t)),
        },
        BaseType::Json => Ok(Primitive::Json(match value {
            SourceValue::Text(s) => serde_json::Value::String(s.clone()),
            SourceValue::Int(i) => serde_json::Value::from(*i),
            SourceValue::Flag(b) => serde_json::Value::Bool(*b),
            SourceValue::Timestamp(t) => serde_json::Value::String(t.to_rfc3339()),
        })),
    }
}
