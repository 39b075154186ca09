//! Process-wide metadata store
//!
//! Reads are a single sharded lookup; inserts lock one shard. Concurrent
//! first-time inspections of the same type may both compute; the last
//! insert wins, which is harmless since inspection is deterministic.

use crate::error::InspectionError;
use crate::metadata::inspector::SchemaInspector;
use crate::metadata::model::TypeMetadata;
use amend_api::{TypeName, Value};
use dashmap::DashMap;
use std::sync::Arc;

/// Cache of [`TypeMetadata`] keyed by runtime type
#[derive(Debug)]
pub struct MetadataCache {
    inspector: SchemaInspector,
    store: DashMap<TypeName, Arc<TypeMetadata>>,
}

impl MetadataCache {
    /// Create empty cache backed by `inspector`
    #[must_use]
    pub fn new(inspector: SchemaInspector) -> Self {
        Self {
            inspector,
            store: DashMap::new(),
        }
    }

    /// Metadata for the runtime type of `value`
    ///
    /// Returns `None` for anything that is not a bean, without touching the
    /// inspector or the store.
    ///
    /// # Errors
    /// Propagates [`InspectionError`] from the inspector.
    pub fn inspect(&self, value: &Value) -> Result<Option<Arc<TypeMetadata>>, InspectionError> {
        match value {
            Value::Bean(bean) => self.inspect_type(&bean.type_name()).map(Some),
            _ => Ok(None),
        }
    }

    /// Metadata for `type_name`, computing and storing it on first use
    ///
    /// # Errors
    /// Propagates [`InspectionError`] from the inspector.
    pub fn inspect_type(&self, type_name: &TypeName) -> Result<Arc<TypeMetadata>, InspectionError> {
        if let Some(cached) = self.store.get(type_name) {
            return Ok(Arc::clone(cached.value()));
        }
        let metadata = Arc::new(self.inspector.inspect(type_name)?);
        tracing::trace!(type_name = %type_name, "cached type metadata");
        self.store.insert(type_name.clone(), Arc::clone(&metadata));
        Ok(metadata)
    }

    /// Number of cached types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if nothing is cached
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amend_api::{Bean, PropertyDecl, Schema, TypeDescriptor, TypeSchema};
    use std::thread;

    fn cache() -> MetadataCache {
        let schema = Schema::builder()
            .ty(TypeSchema::new("Person").property(PropertyDecl::new("name", TypeDescriptor::String)))
            .build();
        MetadataCache::new(SchemaInspector::new(Arc::new(schema)))
    }

    #[test]
    fn null_and_scalars_skip_the_store() {
        let cache = cache();
        assert!(cache.inspect(&Value::Null).unwrap().is_none());
        assert!(cache.inspect(&Value::from("x")).unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn second_lookup_hits_the_store() {
        let cache = cache();
        let bean = Bean::new("Person").build();
        let first = cache.inspect(&bean).unwrap().unwrap();
        let second = cache.inspect(&bean).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = cache();
        assert!(cache.inspect(&Bean::new("Ghost").build()).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_first_inspection() {
        let cache = Arc::new(cache());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    cache
                        .inspect_type(&TypeName::from("Person"))
                        .unwrap()
                        .properties()
                        .len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
        assert_eq!(cache.len(), 1);
    }
}
