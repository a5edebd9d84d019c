//! Scalar values shown exactly as the backend sent them

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A JSON scalar rendered literally (ratings, visit orders, day numbers)
///
/// Never fails to deserialize. Null and structural values display as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Literal(Value);

impl Literal {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Numeric view, accepting numeric strings
    pub fn as_f64(&self) -> Option<f64> {
        match &self.0 {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// True when there is nothing to display
    pub fn is_blank(&self) -> bool {
        match &self.0 {
            Value::String(s) => s.trim().is_empty(),
            Value::Number(_) | Value::Bool(_) => false,
            _ => true,
        }
    }

    /// Display text, or `placeholder` when blank
    pub fn or(&self, placeholder: &str) -> String {
        if self.is_blank() {
            placeholder.to_string()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            _ => Ok(()),
        }
    }
}

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self(Value::deserialize(deserializer)?))
    }
}
