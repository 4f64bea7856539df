//! The value tree every document is made of.

use std::{cell::RefCell, ops::Index, rc::Rc};

use toml::value::Datetime;

use super::Map;

thread_local! {
    /// Target for misses in the `Index` impls. `Value` is not `Sync`, so it
    /// cannot live in a plain `static`.
    static NULL: &'static Value = Box::leak(Box::new(Value::Null));
}

fn null() -> &'static Value {
    NULL.with(|null| *null)
}

/// A node in a document tree.
///
/// Leaves are scalars or opaque atoms (`Bytes`, `Datetime`); branches are
/// `Seq` and `Map`. `Shared` is a branch that may be reachable from several
/// places at once, such as site metadata a pipeline hangs off every page.
///
/// `Value` has no `Clone` impl on purpose: a derived clone would alias every
/// `Shared` node. Use [`crate::paginate::deep_clone`] to copy a document.
#[derive(Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Datetime(Datetime),
    Seq(Vec<Value>),
    Map(Map),
    Shared(Rc<RefCell<Value>>),
}

impl Value {
    /// Wrap a value in a shareable node.
    pub fn shared(value: Value) -> Self {
        Self::Shared(Rc::new(RefCell::new(value)))
    }

    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Datetime(_) => "datetime",
            Self::Seq(_) => "seq",
            Self::Map(_) => "map",
            Self::Shared(_) => "shared",
        }
    }

    /// Returns true for `Seq`, `Map` and `Shared`.
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Seq(_) | Self::Map(_) | Self::Shared(_))
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub const fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_seq_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.as_map_mut().and_then(|map| map.get_mut(key))
    }
}

/// Missing keys and non-map values index to `Null`, like `serde_json`.
///
/// `Shared` nodes cannot hand out plain references and also index to `Null`;
/// borrow them explicitly.
impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or_else(|| null())
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.as_seq()
            .and_then(|items| items.get(index))
            .unwrap_or_else(|| null())
    }
}

// ============================================================================
// Conversions from Rust primitives
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// Counts and page numbers; saturates at `i64::MAX`.
impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Datetime> for Value {
    fn from(dt: Datetime) -> Self {
        Self::Datetime(dt)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Seq(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// ============================================================================
// Direct comparisons with primitives
// ============================================================================

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_integer() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_integer() == Some(i64::from(*other))
    }
}

impl PartialEq<usize> for Value {
    fn eq(&self, other: &usize) -> bool {
        self.as_integer()
            .is_some_and(|n| usize::try_from(n).is_ok_and(|n| n == *other))
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}
