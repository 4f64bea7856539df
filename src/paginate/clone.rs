//! Deep copy of a document.
//!
//! The copy shares nothing with its source: every map, sequence, atom and
//! shared node is allocated fresh. A shared node reachable twice in the
//! source (without forming a cycle) becomes one fresh shared node reachable
//! from the same two places in the copy.
//!
//! Plain maps and sequences are copied with an explicit stack, so document
//! depth never turns into call-stack depth. Only shared nodes recurse, each
//! at most once per copy.

use std::{cell::RefCell, fmt::Write, rc::Rc};

use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use thiserror::Error;

use crate::document::{Map, Value};

/// Why a document could not be copied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloneError {
    #[error("reference cycle at `{path}`")]
    Cycle { path: String },

    #[error("shared node at `{path}` is already mutably borrowed")]
    Borrowed { path: String },
}

impl CloneError {
    pub fn path(&self) -> &str {
        match self {
            Self::Cycle { path } | Self::Borrowed { path } => path,
        }
    }
}

/// Copy `value` into a structurally independent document.
///
/// # Errors
///
/// Fails on a shared node that (transitively) contains itself and on a
/// shared node that is currently mutably borrowed.
pub fn deep_clone(value: &Value) -> Result<Value, CloneError> {
    Cloner::default().copy(value)
}

#[derive(Debug, Clone)]
enum Segment {
    Key(CompactString),
    Index(usize),
}

type NodePtr = *const RefCell<Value>;

/// A container whose children are being copied.
enum Frame<'a> {
    Seq {
        items: &'a [Value],
        next: usize,
        out: Vec<Value>,
    },
    Map {
        map: &'a Map,
        next: usize,
        out: Map,
    },
}

impl<'a> Frame<'a> {
    /// Next child to copy, with the segment naming it.
    fn next_child(&mut self) -> Option<(Segment, &'a Value)> {
        match self {
            Self::Seq { items, next, .. } => {
                let items: &'a [Value] = *items;
                let child = items.get(*next)?;
                let segment = Segment::Index(*next);
                *next += 1;
                Some((segment, child))
            }
            Self::Map { map, next, .. } => {
                let map: &'a Map = *map;
                let (key, child) = map.get_index(*next)?;
                *next += 1;
                Some((Segment::Key(key.into()), child))
            }
        }
    }

    /// Store the copy of the child last handed out by `next_child`.
    fn push(&mut self, value: Value) {
        match self {
            Self::Seq { out, .. } => out.push(value),
            Self::Map { map, next, out } => {
                if let Some((key, _)) = next.checked_sub(1).and_then(|index| map.get_index(index)) {
                    out.insert(key, value);
                }
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Self::Seq { out, .. } => Value::Seq(out),
            Self::Map { out, .. } => Value::Map(out),
        }
    }
}

#[derive(Default)]
struct Cloner {
    /// Location of the node being copied, for error messages
    trail: SmallVec<[Segment; 16]>,
    /// Shared nodes currently being copied (the ones above us)
    open: FxHashSet<NodePtr>,
    /// Shared nodes already copied, mapped to their copy
    done: FxHashMap<NodePtr, Rc<RefCell<Value>>>,
}

impl Cloner {
    fn copy(&mut self, root: &Value) -> Result<Value, CloneError> {
        let mut stack: Vec<Frame<'_>> = Vec::new();
        let mut node = root;
        loop {
            let mut finished = match node {
                Value::Seq(items) => {
                    stack.push(Frame::Seq {
                        items,
                        next: 0,
                        out: Vec::with_capacity(items.len()),
                    });
                    None
                }
                Value::Map(map) => {
                    stack.push(Frame::Map {
                        map,
                        next: 0,
                        out: Map::with_capacity(map.len()),
                    });
                    None
                }
                Value::Shared(shared) => Some(self.copy_shared(shared)?),
                leaf => Some(copy_leaf(leaf)),
            };

            // Climb until some open container still has a child to copy.
            loop {
                let Some(frame) = stack.last_mut() else {
                    // The stack only empties once the root is finished.
                    return Ok(finished.unwrap_or_default());
                };
                if let Some(value) = finished.take() {
                    frame.push(value);
                    self.trail.pop();
                }
                if let Some((segment, child)) = frame.next_child() {
                    self.trail.push(segment);
                    node = child;
                    break;
                }
                finished = stack.pop().map(Frame::finish);
            }
        }
    }

    fn copy_shared(&mut self, node: &Rc<RefCell<Value>>) -> Result<Value, CloneError> {
        let ptr = Rc::as_ptr(node);
        if let Some(copy) = self.done.get(&ptr) {
            return Ok(Value::Shared(Rc::clone(copy)));
        }
        if !self.open.insert(ptr) {
            return Err(CloneError::Cycle { path: self.path() });
        }
        let inner = node
            .try_borrow()
            .map_err(|_| CloneError::Borrowed { path: self.path() })?;
        let copy = Rc::new(RefCell::new(self.copy(&inner)?));
        self.open.remove(&ptr);
        self.done.insert(ptr, Rc::clone(&copy));
        Ok(Value::Shared(copy))
    }

    /// Render the trail as `sections[0].title`; the root is `$`.
    fn path(&self) -> String {
        if self.trail.is_empty() {
            return "$".into();
        }
        let mut out = String::new();
        for segment in &self.trail {
            match segment {
                Segment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                Segment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
            }
        }
        out
    }
}

fn copy_leaf(value: &Value) -> Value {
    match value {
        Value::Bool(b) => Value::Bool(*b),
        Value::Integer(n) => Value::Integer(*n),
        Value::Float(n) => Value::Float(*n),
        Value::String(s) => Value::String(s.clone()),
        Value::Bytes(bytes) => Value::Bytes(bytes.clone()),
        Value::Datetime(dt) => Value::Datetime(*dt),
        Value::Null | Value::Seq(_) | Value::Map(_) | Value::Shared(_) => Value::Null,
    }
}
