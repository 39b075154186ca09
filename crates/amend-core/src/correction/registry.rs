//! Applier dispatch
//!
//! Provides [`CorrectionApplierRegistry`] mapping `(annotation type, value
//! type)` to the applier responsible for it.

use crate::correction::builtin::{builtin_appliers, enum_default_declaration};
use crate::util::types::{boxed_counterpart, types_match};
use amend_api::{AnnotationType, ApplierDeclaration, CorrectionDescriptor, TypeDescriptor};
use parking_lot::RwLock;
use std::collections::HashMap;

type RegistryKey = (AnnotationType, TypeDescriptor);

/// Registry of correction appliers
///
/// Lookup order: enum types always get the shared enum applier; then the
/// exact key; then the key with the boxed or unboxed counterpart; then a
/// scan of the correction's own declared appliers, whose first type match is
/// cached for next time. No match is not an error.
#[derive(Debug)]
pub struct CorrectionApplierRegistry {
    appliers: RwLock<HashMap<RegistryKey, ApplierDeclaration>>,
}

impl Default for CorrectionApplierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrectionApplierRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            appliers: RwLock::new(HashMap::new()),
        }
    }

    /// Create registry seeded with the built-in appliers
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for (annotation, declaration) in builtin_appliers() {
            registry.register(annotation, declaration);
        }
        registry
    }

    /// Register `declaration` for its value type
    pub fn register(&self, annotation: AnnotationType, declaration: ApplierDeclaration) {
        let key = (annotation, declaration.value_type().clone());
        self.appliers.write().insert(key, declaration);
    }

    /// Applier for `descriptor` on values of `target`
    #[must_use]
    pub fn provide(
        &self,
        descriptor: &CorrectionDescriptor,
        target: &TypeDescriptor,
    ) -> Option<ApplierDeclaration> {
        if target.is_enum() {
            return Some(enum_default_declaration(target.clone()));
        }
        let annotation = descriptor.annotation_type();
        if let Some(hit) = self.cached(&annotation, target) {
            tracing::trace!(%annotation, %target, applier = hit.name(), "applier cache hit");
            return Some(hit);
        }

        let found = descriptor
            .spec()
            .corrected_by()
            .iter()
            .find(|d| types_match(d.value_type(), target))?
            .clone();
        tracing::trace!(%annotation, %target, applier = found.name(), "applier resolved from declaration");
        self.appliers
            .write()
            .insert((annotation, target.clone()), found.clone());
        Some(found)
    }

    fn cached(&self, annotation: &AnnotationType, target: &TypeDescriptor) -> Option<ApplierDeclaration> {
        let appliers = self.appliers.read();
        let key = (annotation.clone(), target.clone());
        if let Some(hit) = appliers.get(&key) {
            return Some(hit.clone());
        }
        let boxed = boxed_counterpart(target)?;
        appliers.get(&(annotation.clone(), boxed)).cloned()
    }

    /// Number of cached entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.appliers.read().len()
    }

    /// Check if the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.appliers.read().is_empty()
    }
}
