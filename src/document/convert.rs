//! Conversions between [`Value`] and the `toml` / `serde_json` trees.

use super::{Map, Value};

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Self::String(s),
            toml::Value::Integer(n) => Self::Integer(n),
            toml::Value::Float(n) => Self::Float(n),
            toml::Value::Boolean(b) => Self::Bool(b),
            toml::Value::Datetime(dt) => Self::Datetime(dt),
            toml::Value::Array(items) => Self::Seq(items.into_iter().map(Self::from).collect()),
            toml::Value::Table(table) => Self::Map(table.into()),
        }
    }
}

impl From<toml::Table> for Map {
    fn from(table: toml::Table) -> Self {
        table.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(n) => Self::Integer(n),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::Seq(items.into_iter().map(Self::from).collect()),
            Json::Object(object) => {
                Self::Map(object.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Convert to a TOML value for writing front matter.
///
/// TOML has no null, so `Null` yields `None` and is left out of the
/// enclosing table or array. `Bytes` become an array of integers.
///
/// The tree must be free of cycles; run it through
/// [`crate::paginate::deep_clone`] first when that is not known.
pub fn to_toml(value: &Value) -> Option<toml::Value> {
    Some(match value {
        Value::Null => return None,
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Integer(n) => toml::Value::Integer(*n),
        Value::Float(n) => toml::Value::Float(*n),
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Bytes(bytes) => toml::Value::Array(
            bytes.iter().map(|b| toml::Value::Integer(i64::from(*b))).collect(),
        ),
        Value::Datetime(dt) => toml::Value::Datetime(*dt),
        Value::Seq(items) => toml::Value::Array(items.iter().filter_map(to_toml).collect()),
        Value::Map(map) => toml::Value::Table(to_toml_table(map)),
        Value::Shared(node) => return to_toml(&node.borrow()),
    })
}

pub fn to_toml_table(map: &Map) -> toml::Table {
    map.iter()
        .filter_map(|(k, v)| to_toml(v).map(|v| (k.to_owned(), v)))
        .collect()
}
