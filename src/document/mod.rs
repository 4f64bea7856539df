//! In-memory document model.
//!
//! A [`Collection`] maps a path-like key (`blog/post1.md`) to a document.
//! A document is a [`Value`] tree, normally rooted at a [`Value::Map`].
//!
//! ```text
//! Value
//!  ├── Null | Bool | Integer | Float | String    scalars
//!  ├── Bytes | Datetime                          opaque atoms
//!  ├── Seq(Vec<Value>)                           ordered sequence
//!  ├── Map(Map)                                  insertion-ordered map
//!  └── Shared(Rc<RefCell<Value>>)                node aliased from elsewhere
//! ```

mod convert;
mod map;
mod value;

use std::collections::BTreeMap;

pub use convert::{to_toml, to_toml_table};
pub use map::Map;
pub use value::Value;

/// All documents of a build, keyed by their path relative to the source dir.
pub type Collection = BTreeMap<String, Value>;
