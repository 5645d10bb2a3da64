//! Import value objects
//!
//! Value objects are immutable types shared by the source graph contract, the
//! destination container and the import walker. They are compared by value
//! rather than identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Identifier of a vertex as exposed by a source graph driver
///
/// Drivers use whatever identifier type their store has; the import only ever
/// needs the string form, which becomes the identifier of the imported node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceId {
    /// Numeric identifier (row ids, entity ids)
    Int(i64),
    /// Textual identifier
    Text(String),
    /// UUID identifier
    Uuid(Uuid),
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Int(id) => write!(f, "{id}"),
            SourceId::Text(id) => f.write_str(id),
            SourceId::Uuid(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for SourceId {
    fn from(id: i64) -> Self {
        SourceId::Int(id)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        SourceId::Text(id.to_string())
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        SourceId::Text(id)
    }
}

impl From<Uuid> for SourceId {
    fn from(id: Uuid) -> Self {
        SourceId::Uuid(id)
    }
}

/// Runtime value of a vertex or edge property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// 8-bit signed integer
    Byte(i8),
    /// 16-bit signed integer
    Short(i16),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// Single precision float
    Float(f32),
    /// Double precision float
    Double(f64),
    /// Boolean flag
    Boolean(bool),
    /// Single character
    Char(char),
    /// UTF-8 text
    Text(String),
    /// Point in time
    DateTime(DateTime<Utc>),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered list of values
    List(Vec<PropertyValue>),
    /// Nested key/value map
    Map(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Name of the runtime kind of this value, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Byte(_) => "byte",
            PropertyValue::Short(_) => "short",
            PropertyValue::Int(_) => "int",
            PropertyValue::Long(_) => "long",
            PropertyValue::Float(_) => "float",
            PropertyValue::Double(_) => "double",
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::Char(_) => "char",
            PropertyValue::Text(_) => "text",
            PropertyValue::DateTime(_) => "datetime",
            PropertyValue::Bytes(_) => "bytes",
            PropertyValue::List(_) => "list",
            PropertyValue::Map(_) => "map",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Byte(v) => write!(f, "{v}"),
            PropertyValue::Short(v) => write!(f, "{v}"),
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Long(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Double(v) => write!(f, "{v}"),
            PropertyValue::Boolean(v) => write!(f, "{v}"),
            PropertyValue::Char(v) => write!(f, "{v}"),
            PropertyValue::Text(v) => f.write_str(v),
            PropertyValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            PropertyValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            PropertyValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            PropertyValue::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<i8> for PropertyValue {
    fn from(v: i8) -> Self {
        PropertyValue::Byte(v)
    }
}

impl From<i16> for PropertyValue {
    fn from(v: i16) -> Self {
        PropertyValue::Short(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Long(v)
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Double(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Boolean(v)
    }
}

impl From<char> for PropertyValue {
    fn from(v: char) -> Self {
        PropertyValue::Char(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(v: DateTime<Utc>) -> Self {
        PropertyValue::DateTime(v)
    }
}

/// Semantic type of an attribute column in the destination schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    /// 8-bit integer
    Byte,
    /// 16-bit integer
    Short,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// Single precision float
    Float,
    /// Double precision float
    Double,
    /// Boolean
    Boolean,
    /// Single character
    Char,
    /// Text
    String,
    /// Temporal value
    TimeInterval,
}

impl AttributeType {
    /// Get the string representation of the attribute type
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Byte => "byte",
            AttributeType::Short => "short",
            AttributeType::Int => "int",
            AttributeType::Long => "long",
            AttributeType::Float => "float",
            AttributeType::Double => "double",
            AttributeType::Boolean => "boolean",
            AttributeType::Char => "char",
            AttributeType::String => "string",
            AttributeType::TimeInterval => "time_interval",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema namespace an attribute column lives in
///
/// Node and edge schemas are independent: the same key on a vertex and on an
/// edge yields two unrelated columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeNamespace {
    Node,
    Edge,
}

impl fmt::Display for AttributeNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeNamespace::Node => f.write_str("node"),
            AttributeNamespace::Edge => f.write_str("edge"),
        }
    }
}

/// Direction of an edge relative to a vertex
///
/// For an edge `a -> b`, `a` is its `Out` vertex and `b` its `In` vertex;
/// the edge is one of `b`'s `In` edges and one of `a`'s `Out` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// The opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }
}

/// How source edge endpoints map onto the source/target of an imported edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeOrientation {
    /// Imported edge runs from the edge's `Out` vertex to its `In` vertex
    #[default]
    Preserve,
    /// Imported edge runs from the edge's `In` vertex to its `Out` vertex
    Inverted,
}
