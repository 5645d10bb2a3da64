//! Attribute type inference
//!
//! Maps the runtime kind of a property value onto the semantic attribute type
//! of the destination schema. The mapping is fixed; values outside it have no
//! attribute type and are left to the caller to handle.

use crate::value_objects::{AttributeType, PropertyValue};

/// Infer the attribute type for a property value
///
/// Returns `None` for bytes, lists and maps, which have no column type.
pub fn infer_attribute_type(value: &PropertyValue) -> Option<AttributeType> {
    match value {
        PropertyValue::Byte(_) => Some(AttributeType::Byte),
        PropertyValue::Short(_) => Some(AttributeType::Short),
        PropertyValue::Int(_) => Some(AttributeType::Int),
        PropertyValue::Long(_) => Some(AttributeType::Long),
        PropertyValue::Float(_) => Some(AttributeType::Float),
        PropertyValue::Double(_) => Some(AttributeType::Double),
        PropertyValue::Boolean(_) => Some(AttributeType::Boolean),
        PropertyValue::Char(_) => Some(AttributeType::Char),
        PropertyValue::Text(_) => Some(AttributeType::String),
        PropertyValue::DateTime(_) => Some(AttributeType::TimeInterval),
        PropertyValue::Bytes(_) | PropertyValue::List(_) | PropertyValue::Map(_) => None,
    }
}
