//! Reads and writes of container elements
//!
//! Lists and arrays are addressed by position, maps by key. Arrays are
//! fixed length: elements may be replaced but never appended.

use crate::error::AccessError;
use crate::util::types::ContainerKind;
use amend_api::{MapKey, PathIndex, Value};

fn mismatch(kind: ContainerKind, container: &Value) -> AccessError {
    AccessError::KindMismatch {
        expected: kind.to_string(),
        actual: container.kind_name().to_string(),
    }
}

fn position(kind: ContainerKind, index: &PathIndex) -> Result<usize, AccessError> {
    match index {
        PathIndex::Position(i) => Ok(*i),
        PathIndex::Key(key) => Err(AccessError::KindMismatch {
            expected: format!("{kind} position"),
            actual: format!("key '{key}'"),
        }),
    }
}

fn key(index: &PathIndex) -> Result<&MapKey, AccessError> {
    match index {
        PathIndex::Key(key) => Ok(key),
        PathIndex::Position(i) => Err(AccessError::KindMismatch {
            expected: "map key".to_string(),
            actual: format!("position {i}"),
        }),
    }
}

/// Element of `container` at `index`
///
/// # Errors
/// Returns [`AccessError`] if the container is null, of another kind, or has
/// no element at `index`.
pub fn get_container_value(
    kind: ContainerKind,
    container: &Value,
    index: &PathIndex,
) -> Result<Value, AccessError> {
    match (kind, container) {
        (ContainerKind::List, Value::List(items)) | (ContainerKind::Array, Value::Array(items)) => {
            let i = position(kind, index)?;
            items.get(i).cloned().ok_or(AccessError::IndexOutOfBounds {
                index: i,
                len: items.len(),
            })
        }
        (ContainerKind::Map, Value::Map(entries)) => {
            let key = key(index)?;
            entries
                .get(key)
                .cloned()
                .ok_or_else(|| AccessError::MissingKey(key.clone()))
        }
        _ => Err(mismatch(kind, container)),
    }
}

/// Replace the element of `container` at `index`
///
/// Map keys are inserted if absent. Returns `true` if the stored element
/// changed.
///
/// # Errors
/// Returns [`AccessError`] if the container is null, of another kind, or
/// `index` is out of bounds for a list or array.
pub fn set_container_value(
    kind: ContainerKind,
    container: &mut Value,
    index: &PathIndex,
    new_value: Value,
) -> Result<bool, AccessError> {
    let actual = container.kind_name();
    let slot = match (kind, container) {
        (ContainerKind::List, Value::List(items)) | (ContainerKind::Array, Value::Array(items)) => {
            let i = position(kind, index)?;
            let len = items.len();
            items
                .get_mut(i)
                .ok_or(AccessError::IndexOutOfBounds { index: i, len })?
        }
        (ContainerKind::Map, Value::Map(entries)) => {
            let key = key(index)?;
            entries.entry(key.clone()).or_insert(Value::Null)
        }
        _ => {
            return Err(AccessError::KindMismatch {
                expected: kind.to_string(),
                actual: actual.to_string(),
            })
        }
    };
    let old = std::mem::replace(slot, new_value);
    Ok(!old.is_identical(slot))
}

/// Snapshot of a container's elements with their indices, in order
///
/// # Errors
/// Returns [`AccessError::KindMismatch`] if `container` is not of `kind`.
pub fn container_entries(
    kind: ContainerKind,
    container: &Value,
) -> Result<Vec<(PathIndex, Value)>, AccessError> {
    match (kind, container) {
        (ContainerKind::List, Value::List(items)) | (ContainerKind::Array, Value::Array(items)) => {
            Ok(items
                .iter()
                .enumerate()
                .map(|(i, v)| (PathIndex::Position(i), v.clone()))
                .collect())
        }
        (ContainerKind::Map, Value::Map(entries)) => Ok(entries
            .iter()
            .map(|(k, v)| (PathIndex::Key(k.clone()), v.clone()))
            .collect()),
        _ => Err(mismatch(kind, container)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn map() -> Value {
        let mut entries = IndexMap::new();
        entries.insert(MapKey::from("home"), Value::from("555"));
        Value::Map(entries)
    }

    #[test]
    fn list_set_then_get() {
        let mut list = Value::List(vec![Value::from("a"), Value::from("b")]);
        let index = PathIndex::Position(1);
        assert!(set_container_value(ContainerKind::List, &mut list, &index, Value::from("z")).unwrap());
        assert_eq!(
            get_container_value(ContainerKind::List, &list, &index).unwrap(),
            Value::from("z")
        );
    }

    #[test]
    fn array_set_then_get() {
        let mut array = Value::Array(vec![Value::I32(1), Value::I32(2)]);
        let index = PathIndex::Position(0);
        assert!(set_container_value(ContainerKind::Array, &mut array, &index, Value::I32(7)).unwrap());
        assert_eq!(
            get_container_value(ContainerKind::Array, &array, &index).unwrap(),
            Value::I32(7)
        );
    }

    #[test]
    fn map_set_then_get() {
        let mut container = map();
        let index = PathIndex::Key(MapKey::from("home"));
        assert!(set_container_value(ContainerKind::Map, &mut container, &index, Value::from("556")).unwrap());
        assert_eq!(
            get_container_value(ContainerKind::Map, &container, &index).unwrap(),
            Value::from("556")
        );
    }

    #[test]
    fn identical_write_did_not_take_effect() {
        let mut list = Value::List(vec![Value::from("a")]);
        let index = PathIndex::Position(0);
        assert!(!set_container_value(ContainerKind::List, &mut list, &index, Value::from("a")).unwrap());
    }

    #[test]
    fn array_never_grows() {
        let mut array = Value::Array(vec![Value::I32(1)]);
        let err = set_container_value(ContainerKind::Array, &mut array, &PathIndex::Position(3), Value::I32(2))
            .unwrap_err();
        assert_eq!(err, AccessError::IndexOutOfBounds { index: 3, len: 1 });
    }

    #[test]
    fn absent_map_key() {
        let err = get_container_value(
            ContainerKind::Map,
            &map(),
            &PathIndex::Key(MapKey::from("work")),
        )
        .unwrap_err();
        assert_eq!(err, AccessError::MissingKey(MapKey::from("work")));
    }

    #[test]
    fn kind_mismatch() {
        let err = get_container_value(ContainerKind::List, &map(), &PathIndex::Position(0)).unwrap_err();
        assert!(matches!(err, AccessError::KindMismatch { .. }));
        let err = get_container_value(ContainerKind::Map, &map(), &PathIndex::Position(0)).unwrap_err();
        assert!(matches!(err, AccessError::KindMismatch { .. }));
    }

    #[test]
    fn entries_preserve_order() {
        let list = Value::List(vec![Value::from("a"), Value::from("b")]);
        let entries = container_entries(ContainerKind::List, &list).unwrap();
        assert_eq!(entries[1], (PathIndex::Position(1), Value::from("b")));
    }
}
