//! Property reads and write-backs on beans
//!
//! Container elements are mutated in place inside the owning property's
//! slot, so they only require the property to be readable.

use crate::error::AccessError;
use crate::metadata::PropertyMetadata;
use crate::util::container::{get_container_value, set_container_value};
use crate::util::types::ContainerKind;
use amend_api::{BeanRef, PathIndex, Value};

fn ensure_readable(bean: &BeanRef, property: &PropertyMetadata) -> Result<(), AccessError> {
    if property.is_readable() {
        Ok(())
    } else {
        Err(AccessError::NotReadable {
            owner: bean.type_name(),
            property: property.name().to_string(),
        })
    }
}

/// Current value of `property` on `bean`
///
/// # Errors
/// Returns [`AccessError::NotReadable`] if the property cannot be read.
pub fn get_property_value(bean: &BeanRef, property: &PropertyMetadata) -> Result<Value, AccessError> {
    ensure_readable(bean, property)?;
    Ok(bean.get(property.name()))
}

/// Write `new_value` to `property` on `bean`
///
/// Returns `true` if the stored value changed. Read-only properties are
/// skipped and report `false`.
///
/// # Errors
/// Returns [`AccessError::NotReadable`] if the property cannot be read.
pub fn set_property_value(
    bean: &BeanRef,
    property: &PropertyMetadata,
    new_value: Value,
) -> Result<bool, AccessError> {
    ensure_readable(bean, property)?;
    if !property.is_writable() {
        tracing::debug!(
            property = property.name(),
            "skipping write-back to read-only property"
        );
        return Ok(false);
    }
    Ok(bean.with_mut(|data| {
        let slot = data.slot_mut(property.name());
        let old = std::mem::replace(slot, new_value);
        !old.is_identical(slot)
    }))
}

/// Element at `index` of the container held by `property`
///
/// # Errors
/// Returns [`AccessError`] if the property is unreadable, the container is
/// null, or the element cannot be addressed.
pub fn get_element_value(
    bean: &BeanRef,
    property: &PropertyMetadata,
    kind: ContainerKind,
    index: &PathIndex,
) -> Result<Value, AccessError> {
    ensure_readable(bean, property)?;
    bean.with(|data| match data.get_ref(property.name()) {
        None | Some(Value::Null) => Err(AccessError::MissingContainer {
            property: property.name().to_string(),
        }),
        Some(container) => get_container_value(kind, container, index),
    })
}

/// Replace the element at `index` of the container held by `property`
///
/// Returns `true` if the stored element changed.
///
/// # Errors
/// Returns [`AccessError`] if the property is unreadable, the container is
/// null, or the element cannot be addressed.
pub fn set_element_value(
    bean: &BeanRef,
    property: &PropertyMetadata,
    kind: ContainerKind,
    index: &PathIndex,
    new_value: Value,
) -> Result<bool, AccessError> {
    ensure_readable(bean, property)?;
    bean.with_mut(|data| {
        if data.get_ref(property.name()).map_or(true, Value::is_null) {
            return Err(AccessError::MissingContainer {
                property: property.name().to_string(),
            });
        }
        set_container_value(kind, data.slot_mut(property.name()), index, new_value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationSource;
    use amend_api::{Bean, TypeDescriptor};

    fn property(name: &str, readable: bool, writable: bool) -> PropertyMetadata {
        PropertyMetadata {
            name: name.to_string(),
            declared_type: TypeDescriptor::list(TypeDescriptor::String),
            corrections: Vec::new(),
            modifiers: Vec::new(),
            readable,
            writable,
            origin: ConfigurationSource::Schema,
        }
    }

    #[test]
    fn write_reports_effect() {
        let bean = Bean::new("Person").with("name", "a").build_ref();
        let name = property("name", true, true);
        assert!(set_property_value(&bean, &name, Value::from("b")).unwrap());
        assert!(!set_property_value(&bean, &name, Value::from("b")).unwrap());
        assert_eq!(get_property_value(&bean, &name).unwrap(), Value::from("b"));
    }

    #[test]
    fn read_only_write_is_skipped() {
        let bean = Bean::new("Person").with("name", "a").build_ref();
        let name = property("name", true, false);
        assert!(!set_property_value(&bean, &name, Value::from("b")).unwrap());
        assert_eq!(bean.get("name"), Value::from("a"));
    }

    #[test]
    fn unreadable_property_errors() {
        let bean = Bean::new("Person").build_ref();
        let err = get_property_value(&bean, &property("secret", false, true)).unwrap_err();
        assert!(matches!(err, AccessError::NotReadable { .. }));
    }

    #[test]
    fn element_write_goes_through_owner() {
        let bean = Bean::new("Person")
            .with("tags", Value::List(vec![Value::from(" a ")]))
            .build_ref();
        let tags = property("tags", true, false);
        let index = PathIndex::Position(0);
        assert!(set_element_value(&bean, &tags, ContainerKind::List, &index, Value::from("a")).unwrap());
        assert_eq!(
            get_element_value(&bean, &tags, ContainerKind::List, &index).unwrap(),
            Value::from("a")
        );
    }

    #[test]
    fn null_container_errors() {
        let bean = Bean::new("Person").build_ref();
        let err = get_element_value(
            &bean,
            &property("tags", true, true),
            ContainerKind::List,
            &PathIndex::Position(0),
        )
        .unwrap_err();
        assert!(matches!(err, AccessError::MissingContainer { .. }));
    }
}
