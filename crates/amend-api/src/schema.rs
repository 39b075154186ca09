//! Statically declared schema
//!
//! The schema describes every bean type the engine may encounter: its
//! properties, where annotations sit on them, its supertype, and the enum and
//! group declarations the corrections refer to. It is built once at startup
//! and shared read-only.
//!
//! # Example
//! ```rust
//! use amend_api::{CorrectionDescriptor, PropertyDecl, Schema, TypeDescriptor, TypeSchema};
//!
//! let schema = Schema::builder()
//!     .ty(TypeSchema::new("Person")
//!         .property(PropertyDecl::new("name", TypeDescriptor::String)
//!             .on_field(CorrectionDescriptor::trim())))
//!     .build();
//!
//! assert!(schema.type_schema(&"Person".into()).is_some());
//! assert!(schema.group(&amend_api::GroupId::default_group()).is_some());
//! ```

use crate::correction::CorrectionDescriptor;
use crate::group::{GroupDefinition, GroupId};
use crate::types::{TypeDescriptor, TypeName};
use indexmap::IndexMap;

/// Annotation attached to a type, getter, setter or field
#[derive(Debug, Clone)]
pub enum Annotation {
    /// A correction
    Correction(CorrectionDescriptor),

    /// Descend into the property's value or elements during traversal
    CorrectNested,

    /// Any other annotation; ignored by the engine
    Marker(String),
}

impl Annotation {
    /// Non-correction marker annotation
    #[inline]
    #[must_use]
    pub fn marker(name: impl Into<String>) -> Self {
        Self::Marker(name.into())
    }

    /// Correction descriptor, if this is a correction
    #[inline]
    #[must_use]
    pub fn as_correction(&self) -> Option<&CorrectionDescriptor> {
        match self {
            Self::Correction(descriptor) => Some(descriptor),
            _ => None,
        }
    }
}

impl From<CorrectionDescriptor> for Annotation {
    fn from(descriptor: CorrectionDescriptor) -> Self {
        Self::Correction(descriptor)
    }
}

/// Declaration of one property
///
/// A property has up to three sites: getter, setter and backing field.
/// Readable if a getter or field exists; writable if a setter exists or if
/// it is a bare field with no accessors.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    name: String,
    declared_type: TypeDescriptor,
    getter: Option<Vec<Annotation>>,
    setter: Option<Vec<Annotation>>,
    field: Option<Vec<Annotation>>,
}

impl PropertyDecl {
    /// Accessor-backed property with getter, setter and field
    #[must_use]
    pub fn new(name: impl Into<String>, declared_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            declared_type,
            getter: Some(Vec::new()),
            setter: Some(Vec::new()),
            field: Some(Vec::new()),
        }
    }

    /// Bare field without accessors
    #[must_use]
    pub fn field(name: impl Into<String>, declared_type: TypeDescriptor) -> Self {
        Self {
            getter: None,
            setter: None,
            ..Self::new(name, declared_type)
        }
    }

    /// Drop the setter, making an accessor-backed property read-only
    #[must_use]
    pub fn without_setter(mut self) -> Self {
        self.setter = None;
        self
    }

    /// Drop the backing field
    #[must_use]
    pub fn without_field(mut self) -> Self {
        self.field = None;
        self
    }

    /// Annotate the backing field, adding the site if absent
    #[must_use]
    pub fn on_field(mut self, annotation: impl Into<Annotation>) -> Self {
        self.field.get_or_insert_with(Vec::new).push(annotation.into());
        self
    }

    /// Annotate the getter, adding the site if absent
    #[must_use]
    pub fn on_getter(mut self, annotation: impl Into<Annotation>) -> Self {
        self.getter.get_or_insert_with(Vec::new).push(annotation.into());
        self
    }

    /// Annotate the setter, adding the site if absent
    #[must_use]
    pub fn on_setter(mut self, annotation: impl Into<Annotation>) -> Self {
        self.setter.get_or_insert_with(Vec::new).push(annotation.into());
        self
    }

    /// Mark for nested traversal
    #[must_use]
    pub fn nested(self) -> Self {
        self.on_field(Annotation::CorrectNested)
    }

    /// Property name
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

    /// Annotations on getter, setter and field, in that order
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        [&self.getter, &self.setter, &self.field]
            .into_iter()
            .flatten()
            .flatten()
    }

    /// Check if the property can be read
    #[inline]
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.getter.is_some() || self.field.is_some()
    }

    /// Check if the property can be written
    #[inline]
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.setter.is_some() || (self.getter.is_none() && self.field.is_some())
    }
}

/// Declaration of a bean type
#[derive(Debug, Clone)]
pub struct TypeSchema {
    name: TypeName,
    extends: Option<TypeName>,
    annotations: Vec<Annotation>,
    properties: Vec<PropertyDecl>,
}

impl TypeSchema {
    /// Start declaring a type
    #[must_use]
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            annotations: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Set supertype
    #[must_use]
    pub fn extends(mut self, parent: impl Into<TypeName>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Add a class-level annotation
    #[must_use]
    pub fn annotate(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Add a property
    #[must_use]
    pub fn property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    /// Type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Supertype, if any
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&TypeName> {
        self.extends.as_ref()
    }

    /// Class-level annotations
    #[inline]
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Declared properties, in declaration order
    #[inline]
    #[must_use]
    pub fn properties(&self) -> &[PropertyDecl] {
        &self.properties
    }
}

/// Declaration of an enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    name: TypeName,
    variants: Vec<String>,
}

impl EnumSchema {
    /// Declare an enum with its variants
    #[must_use]
    pub fn new<I, S>(name: impl Into<TypeName>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Enum name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Check if `variant` is declared
    #[must_use]
    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }

    /// Declared variants
    #[inline]
    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }
}

/// Complete schema of types, enums and groups
#[derive(Debug, Clone)]
pub struct Schema {
    types: IndexMap<TypeName, TypeSchema>,
    enums: IndexMap<TypeName, EnumSchema>,
    groups: IndexMap<GroupId, GroupDefinition>,
}

impl Schema {
    /// Start building a schema
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Type declaration by name
    #[inline]
    #[must_use]
    pub fn type_schema(&self, name: &TypeName) -> Option<&TypeSchema> {
        self.types.get(name)
    }

    /// Enum declaration by name
    #[inline]
    #[must_use]
    pub fn enum_schema(&self, name: &TypeName) -> Option<&EnumSchema> {
        self.enums.get(name)
    }

    /// Group declaration by id
    #[inline]
    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&GroupDefinition> {
        self.groups.get(id)
    }

    /// All declared types
    pub fn types(&self) -> impl Iterator<Item = &TypeSchema> {
        self.types.values()
    }
}

/// Builder for [`Schema`]
///
/// Later declarations with the same name replace earlier ones.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    types: IndexMap<TypeName, TypeSchema>,
    enums: IndexMap<TypeName, EnumSchema>,
    groups: IndexMap<GroupId, GroupDefinition>,
}

impl SchemaBuilder {
    /// Declare a bean type
    #[must_use]
    pub fn ty(mut self, schema: TypeSchema) -> Self {
        self.types.insert(schema.name().clone(), schema);
        self
    }

    /// Declare an enum
    #[must_use]
    pub fn enumeration(mut self, schema: EnumSchema) -> Self {
        self.enums.insert(schema.name().clone(), schema);
        self
    }

    /// Declare a group
    #[must_use]
    pub fn group(mut self, definition: GroupDefinition) -> Self {
        self.groups.insert(definition.id().clone(), definition);
        self
    }

    /// Finish the schema; the default group is always present
    #[must_use]
    pub fn build(mut self) -> Schema {
        self.groups
            .entry(GroupId::default_group())
            .or_insert_with(|| GroupDefinition::marker(GroupId::default_group()));
        Schema {
            types: self.types,
            enums: self.enums,
            groups: self.groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_rules() {
        let full = PropertyDecl::new("name", TypeDescriptor::String);
        assert!(full.is_readable() && full.is_writable());

        let bare = PropertyDecl::field("name", TypeDescriptor::String);
        assert!(bare.is_readable() && bare.is_writable());

        let read_only = PropertyDecl::new("name", TypeDescriptor::String).without_setter();
        assert!(read_only.is_readable());
        assert!(!read_only.is_writable());
    }

    #[test]
    fn annotations_iterate_getter_setter_field() {
        let decl = PropertyDecl::new("name", TypeDescriptor::String)
            .on_field(Annotation::marker("field"))
            .on_getter(Annotation::marker("getter"))
            .on_setter(Annotation::marker("setter"));
        let names: Vec<_> = decl
            .annotations()
            .filter_map(|a| match a {
                Annotation::Marker(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["getter", "setter", "field"]);
    }

    #[test]
    fn builder_registers_default_group() {
        let schema = Schema::builder()
            .group(GroupDefinition::marker("Slough"))
            .build();
        assert!(schema.group(&GroupId::default_group()).is_some());
        assert!(schema.group(&GroupId::from("Slough")).is_some());
    }

    #[test]
    fn enum_variants() {
        let department = EnumSchema::new("Department", ["SALES", "ACCOUNTING"]);
        assert!(department.has_variant("SALES"));
        assert!(!department.has_variant("HR"));
    }
}
