//! Recursive parameter values carried by parsed commands.

use serde_json::{Map, Number, Value};

/// A command parameter value.
///
/// Maps keep the order the keys appeared in the request body.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<ParamValue>),
    Map(Vec<(String, ParamValue)>),
}

impl ParamValue {
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ParamValue::Bool(_) | ParamValue::Number(_) | ParamValue::String(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// String form of a scalar, as a v1 handler would receive it.
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            ParamValue::Bool(b) => Some(b.to_string()),
            ParamValue::Number(n) => Some(n.to_string()),
            ParamValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Compact JSON text of the value.
    pub fn to_json_string(&self) -> String {
        Value::from(self).to_string()
    }

    pub(crate) fn map_from_json(map: Map<String, Value>) -> Vec<(String, ParamValue)> {
        map.into_iter().map(|(k, v)| (k, v.into())).collect()
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => ParamValue::Number(n),
            Value::String(s) => ParamValue::String(s),
            Value::Array(items) => ParamValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => ParamValue::Map(Self::map_from_json(map)),
        }
    }
}

impl From<&ParamValue> for Value {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Null => Value::Null,
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Number(n) => Value::Number(n.clone()),
            ParamValue::String(s) => Value::String(s.clone()),
            ParamValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            ParamValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}
