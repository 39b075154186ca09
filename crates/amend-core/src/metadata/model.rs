//! Structural description of bean types

use crate::error::ConfigurationSource;
use amend_api::{CorrectionDescriptor, TypeDescriptor, TypeName};
use std::sync::Arc;

/// Annotation changing how traversal treats a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalModifier {
    /// Descend into the property's value or elements
    CorrectNested,
}

/// Metadata of one property after supertype merge
#[derive(Debug, Clone)]
pub struct PropertyMetadata {
    pub(crate) name: String,
    pub(crate) declared_type: TypeDescriptor,
    pub(crate) corrections: Vec<CorrectionDescriptor>,
    pub(crate) modifiers: Vec<TraversalModifier>,
    pub(crate) readable: bool,
    pub(crate) writable: bool,
    pub(crate) origin: ConfigurationSource,
}

impl PropertyMetadata {
    /// Property name, unique within the owning type
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    #[inline]
    #[must_use]
    pub fn declared_type(&self) -> &TypeDescriptor {
        &self.declared_type
    }

    /// Corrections, de-duplicated by annotation type
    #[inline]
    #[must_use]
    pub fn corrections(&self) -> &[CorrectionDescriptor] {
        &self.corrections
    }

    /// Traversal modifiers
    #[inline]
    #[must_use]
    pub fn modifiers(&self) -> &[TraversalModifier] {
        &self.modifiers
    }

    /// Check if traversal descends into this property
    #[inline]
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.modifiers.contains(&TraversalModifier::CorrectNested)
    }

    /// Check if the property can be read
    #[inline]
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Check if write-back is possible
    #[inline]
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Where this property was declared
    #[inline]
    #[must_use]
    pub fn origin(&self) -> ConfigurationSource {
        self.origin
    }
}

/// Metadata of one bean type; immutable once built
#[derive(Debug, Clone)]
pub struct TypeMetadata {
    pub(crate) type_name: TypeName,
    pub(crate) corrections: Vec<CorrectionDescriptor>,
    pub(crate) properties: Vec<Arc<PropertyMetadata>>,
    pub(crate) origin: ConfigurationSource,
}

impl TypeMetadata {
    /// Owning type
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Class-level corrections
    #[inline]
    #[must_use]
    pub fn corrections(&self) -> &[CorrectionDescriptor] {
        &self.corrections
    }

    /// Properties: own ones first, then inherited ones not shadowed
    #[inline]
    #[must_use]
    pub fn properties(&self) -> &[Arc<PropertyMetadata>] {
        &self.properties
    }

    /// Property by name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Arc<PropertyMetadata>> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Where this type was declared
    #[inline]
    #[must_use]
    pub fn origin(&self) -> ConfigurationSource {
        self.origin
    }
}
