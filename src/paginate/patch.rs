//! Locate the pagination section and overwrite fields anywhere below it.
//!
//! Both walks are iterative depth-first traversals with an explicit stack,
//! so document depth never turns into call-stack depth. Only shared nodes
//! recurse, and each shared node is entered at most once per walk, which
//! also keeps cyclic documents from looping.

use std::{cell::RefCell, rc::Rc};

use rustc_hash::FxHashSet;
use thiserror::Error;

use super::clone::{CloneError, deep_clone};
use super::window::fields::HAS_PAGING_PARAMS;
use crate::document::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("shared node is already borrowed elsewhere")]
    Borrowed,

    #[error("cannot copy patch value")]
    Value(#[from] CloneError),
}

/// What to do after visiting a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Descend,
    Stop,
}

type Seen = FxHashSet<*const RefCell<Value>>;

/// Pre-order walk calling `visit` on every map, children in document order.
fn walk_maps_mut<F>(root: &mut Value, visit: &mut F, seen: &mut Seen) -> Result<Flow, PatchError>
where
    F: FnMut(&mut Map) -> Result<Flow, PatchError>,
{
    let mut stack: Vec<&mut Value> = vec![root];
    while let Some(node) = stack.pop() {
        match node {
            Value::Map(map) => {
                if visit(&mut *map)? == Flow::Stop {
                    return Ok(Flow::Stop);
                }
                stack.extend(map.values_mut().rev());
            }
            Value::Seq(items) => stack.extend(items.iter_mut().rev()),
            Value::Shared(node) => {
                if !seen.insert(Rc::as_ptr(node)) {
                    continue;
                }
                let node = Rc::clone(node);
                let mut inner = node.try_borrow_mut().map_err(|_| PatchError::Borrowed)?;
                if walk_maps_mut(&mut inner, visit, seen)? == Flow::Stop {
                    return Ok(Flow::Stop);
                }
            }
            _ => {}
        }
    }
    Ok(Flow::Descend)
}

/// Read-only counterpart of [`walk_maps_mut`], stopping at the first match.
fn any_map<F>(root: &Value, pred: &F, seen: &mut Seen) -> bool
where
    F: Fn(&Map) -> bool,
{
    let mut stack: Vec<&Value> = vec![root];
    while let Some(node) = stack.pop() {
        match node {
            Value::Map(map) => {
                if pred(map) {
                    return true;
                }
                stack.extend(map.values().rev());
            }
            Value::Seq(items) => stack.extend(items.iter().rev()),
            Value::Shared(node) => {
                if !seen.insert(Rc::as_ptr(node)) {
                    continue;
                }
                // A node borrowed mutably elsewhere cannot be inspected;
                // the later patch reports it.
                if let Ok(inner) = node.try_borrow()
                    && any_map(&inner, pred, seen)
                {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

fn is_section(map: &Map) -> bool {
    matches!(map.get(HAS_PAGING_PARAMS), Some(Value::Bool(true)))
}

/// Each written value is a fresh copy, so patched documents never share.
fn overwrite(map: &mut Map, updates: &Map) -> Result<(), PatchError> {
    for (key, value) in updates.iter() {
        if let Some(slot) = map.get_mut(key) {
            *slot = deep_clone(value)?;
        }
    }
    Ok(())
}

/// Overwrite every occurrence of each key in `updates`, at any depth.
///
/// Every map in `subtree` that has one of the keys gets the new value,
/// then the walk continues into all of that map's children, the freshly
/// written ones included. Keys that are not already present are not added.
/// A scalar `subtree` is left alone.
pub fn patch_fields(subtree: &mut Value, updates: &Map) -> Result<(), PatchError> {
    let mut seen = Seen::default();
    walk_maps_mut(
        subtree,
        &mut |map: &mut Map| {
            overwrite(map, updates)?;
            Ok(Flow::Descend)
        },
        &mut seen,
    )?;
    Ok(())
}

/// Returns true if `document` has a map with `hasPagingParams = true`.
pub fn has_section(document: &Value) -> bool {
    any_map(document, &is_section, &mut Seen::default())
}

/// Patch the first pagination section of `document` (in document order).
///
/// Later sections carrying the marker are left untouched. Returns `false`
/// when the document has no section.
pub fn patch_section(document: &mut Value, updates: &Map) -> Result<bool, PatchError> {
    let mut found = false;
    let mut seen = Seen::default();
    walk_maps_mut(
        document,
        &mut |map: &mut Map| {
            if !is_section(map) {
                return Ok(Flow::Descend);
            }
            found = true;
            overwrite(map, updates)?;
            for child in map.values_mut() {
                patch_fields(child, updates)?;
            }
            Ok(Flow::Stop)
        },
        &mut seen,
    )?;
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn updates(pairs: &[(&str, i64)]) -> Map {
        pairs.iter().map(|(k, v)| (*k, Value::from(*v))).collect()
    }

    #[test]
    fn test_patch_fields_all_depths() {
        let mut section = doc(json!({
            "numberOfBlogs": 0,
            "pageNumber": 0,
            "nested": { "deeper": { "deepest": { "numberOfBlogs": 0, "pageNumber": 0 } } },
            "list": [ { "numberOfBlogs": 0 }, [ { "numberOfBlogs": 0 } ], 5 ]
        }));

        patch_fields(&mut section, &updates(&[("numberOfBlogs", 7), ("pageNumber", 2)])).unwrap();

        assert_eq!(section["numberOfBlogs"], 7);
        assert_eq!(section["pageNumber"], 2);
        assert_eq!(section["nested"]["deeper"]["deepest"]["numberOfBlogs"], 7);
        assert_eq!(section["nested"]["deeper"]["deepest"]["pageNumber"], 2);
        assert_eq!(section["list"][0]["numberOfBlogs"], 7);
        assert_eq!(section["list"][1][0]["numberOfBlogs"], 7);
        assert_eq!(section["list"][2], 5);
    }

    #[test]
    fn test_patch_fields_does_not_add_keys() {
        let mut section = doc(json!({ "hasPagingParams": true, "other": { "x": 1 } }));

        patch_fields(&mut section, &updates(&[("pageStart", 3)])).unwrap();

        assert!(section.get("pageStart").is_none());
        assert!(section["other"].get("pageStart").is_none());
    }

    #[test]
    fn test_patch_fields_overwrites_any_type() {
        let mut section = doc(json!({ "pageStart": { "was": "a map" }, "pageNumber": null }));

        patch_fields(&mut section, &updates(&[("pageStart", 3), ("pageNumber", 1)])).unwrap();

        assert_eq!(section["pageStart"], 3);
        assert_eq!(section["pageNumber"], 1);
    }

    #[test]
    fn test_patch_fields_scalar_is_noop() {
        let mut value = Value::from("text");
        patch_fields(&mut value, &updates(&[("pageStart", 3)])).unwrap();
        assert_eq!(value, "text");
    }

    #[test]
    fn test_patch_fields_descends_into_written_value() {
        let descriptor: Map = [("pageNumber", Value::from(0))].into_iter().collect();
        let mut update = updates(&[("pageNumber", 4)]);
        update.insert("pagination", Value::Map(descriptor));
        let mut section = doc(json!({ "pagination": 0, "pageNumber": 0 }));

        patch_fields(&mut section, &update).unwrap();

        assert_eq!(section["pageNumber"], 4);
        assert_eq!(section["pagination"]["pageNumber"], 4);
    }

    #[test]
    fn test_patch_fields_through_shared_cycle() {
        let node = Rc::new(RefCell::new(doc(json!({ "pageNumber": 0 }))));
        node.borrow_mut()
            .as_map_mut()
            .unwrap()
            .insert("self", Value::Shared(Rc::clone(&node)));
        let mut section = Value::Seq(vec![Value::Shared(Rc::clone(&node))]);

        patch_fields(&mut section, &updates(&[("pageNumber", 9)])).unwrap();

        assert_eq!(node.borrow()["pageNumber"], 9);
        node.borrow_mut().as_map_mut().unwrap().remove("self");
    }

    #[test]
    fn test_patch_fields_borrowed_shared_node() {
        let node = Rc::new(RefCell::new(doc(json!({ "pageNumber": 0 }))));
        let mut section = Value::Seq(vec![Value::Shared(Rc::clone(&node))]);

        let _guard = node.borrow();
        let err = patch_fields(&mut section, &updates(&[("pageNumber", 9)])).unwrap_err();

        assert_eq!(err, PatchError::Borrowed);
    }

    #[test]
    fn test_has_section() {
        assert!(has_section(&doc(json!({ "sections": [{ "hasPagingParams": true }] }))));
        assert!(has_section(&doc(json!({ "a": { "b": [[{ "hasPagingParams": true }]] } }))));
        assert!(!has_section(&doc(json!({ "sections": [{ "hasPagingParams": false }] }))));
        assert!(!has_section(&doc(json!({ "sections": [{ "hasPagingParams": "true" }] }))));
        assert!(!has_section(&doc(json!({}))));
        assert!(!has_section(&Value::from(3)));
    }

    #[test]
    fn test_has_section_inside_shared() {
        let section = Value::shared(doc(json!({ "hasPagingParams": true })));
        let document = Value::Seq(vec![section]);
        assert!(has_section(&document));
    }

    #[test]
    fn test_patch_section_first_only() {
        let mut document = doc(json!({
            "sections": [
                { "hasPagingParams": false, "numberOfBlogs": 0 },
                { "hasPagingParams": true, "numberOfBlogs": 0 },
                { "hasPagingParams": true, "numberOfBlogs": 0 }
            ]
        }));

        let found = patch_section(&mut document, &updates(&[("numberOfBlogs", 3)])).unwrap();

        assert!(found);
        assert_eq!(document["sections"][0]["numberOfBlogs"], 0);
        assert_eq!(document["sections"][1]["numberOfBlogs"], 3);
        assert_eq!(document["sections"][2]["numberOfBlogs"], 0);
    }

    #[test]
    fn test_patch_section_pre_order() {
        // The outer section comes before the one nested inside it.
        let mut document = doc(json!({
            "hero": {
                "hasPagingParams": true,
                "pageNumber": 0,
                "inner": { "hasPagingParams": true, "pageNumber": 0 }
            }
        }));

        patch_section(&mut document, &updates(&[("pageNumber", 2)])).unwrap();

        assert_eq!(document["hero"]["pageNumber"], 2);
        // Inside the patched section every match is written.
        assert_eq!(document["hero"]["inner"]["pageNumber"], 2);
    }

    #[test]
    fn test_patch_section_leaves_outside_fields() {
        let mut document = doc(json!({
            "numberOfBlogs": 0,
            "sections": [{ "hasPagingParams": true, "numberOfBlogs": 0 }]
        }));

        patch_section(&mut document, &updates(&[("numberOfBlogs", 5)])).unwrap();

        assert_eq!(document["numberOfBlogs"], 0);
        assert_eq!(document["sections"][0]["numberOfBlogs"], 5);
    }

    #[test]
    fn test_patch_section_missing() {
        let mut document = doc(json!({ "sections": [{ "numberOfBlogs": 0 }] }));

        let found = patch_section(&mut document, &updates(&[("numberOfBlogs", 5)])).unwrap();

        assert!(!found);
        assert_eq!(document["sections"][0]["numberOfBlogs"], 0);
    }

    #[test]
    fn test_patch_deep_document_without_stack_overflow() {
        let mut value = doc(json!({ "pageNumber": 0 }));
        for _ in 0..50_000 {
            let mut map = Map::new();
            map.insert("child", value);
            value = Value::Map(map);
        }
        let mut section = Map::new();
        section.insert("hasPagingParams", Value::from(true));
        section.insert("child", value);
        let mut document = Value::Map(section);

        assert!(patch_section(&mut document, &updates(&[("pageNumber", 3)])).unwrap());

        let mut cursor = &document;
        while let Some(child) = cursor.get("child") {
            cursor = child;
        }
        assert_eq!(cursor["pageNumber"], 3);

        // Unwind iteratively; dropping 50k nested maps recursively would
        // overflow the test thread's stack.
        let mut next = document.as_map_mut().and_then(|map| map.remove("child"));
        while let Some(mut value) = next {
            next = value.as_map_mut().and_then(|map| map.remove("child"));
        }
    }
}
