//! Animatable property values

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Property map of a keyframe or a resolved element, in declaration order
pub type Properties = IndexMap<String, PropertyValue>;

/// A single keyframe property value
///
/// Scene documents store plain JSON values; numbers and `#RRGGBB` strings are
/// blended, anything else steps discretely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Any JSON number
    Number(f64),
    /// Any JSON string (hex colors included)
    Text(String),
    /// Booleans, arrays, objects and null
    Other(serde_json::Value),
}

impl PropertyValue {
    /// Value used for a key that is missing on one side of a segment
    pub const ZERO: PropertyValue = PropertyValue::Number(0.0);

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse the value as a `#RRGGBB` color, if it is one
    pub fn as_color(&self) -> Option<Color> {
        self.as_str().and_then(Color::parse_hex)
    }

    /// Short name of the value kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Number(_) => "number",
            PropertyValue::Text(s) if Color::is_hex(s) => "color",
            PropertyValue::Text(_) => "string",
            PropertyValue::Other(serde_json::Value::Bool(_)) => "bool",
            PropertyValue::Other(serde_json::Value::Null) => "null",
            PropertyValue::Other(serde_json::Value::Array(_)) => "array",
            PropertyValue::Other(_) => "object",
        }
    }
}

impl Default for PropertyValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<Color> for PropertyValue {
    fn from(color: Color) -> Self {
        PropertyValue::Text(color.to_hex())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Other(serde_json::Value::Bool(value))
    }
}
