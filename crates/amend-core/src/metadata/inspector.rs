//! Builds [`TypeMetadata`] from the schema
//!
//! Annotations on getter, setter and field are unioned per property and
//! de-duplicated by annotation type (first site wins, in that order).
//! Supertype properties are merged in without overriding the subtype's.

use crate::error::{ConfigurationSource, InspectionError};
use crate::metadata::model::{PropertyMetadata, TraversalModifier, TypeMetadata};
use amend_api::{Annotation, CorrectionDescriptor, CorrectionSpec, PropertyDecl, Schema, TypeName};
use std::collections::HashSet;
use std::sync::Arc;

/// Property name used when reporting class-level annotation problems
const CLASS_LEVEL: &str = "<class>";

/// Inspector reading the statically declared schema
#[derive(Debug, Clone)]
pub struct SchemaInspector {
    schema: Arc<Schema>,
}

impl SchemaInspector {
    /// Create inspector over `schema`
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// Source of the metadata this inspector builds
    #[inline]
    #[must_use]
    pub fn origin(&self) -> ConfigurationSource {
        ConfigurationSource::Schema
    }

    /// Build metadata for `type_name`
    ///
    /// # Errors
    /// Returns [`InspectionError`] if the type or a supertype is undeclared,
    /// the supertype chain is circular, or an enum default is invalid.
    pub fn inspect(&self, type_name: &TypeName) -> Result<TypeMetadata, InspectionError> {
        let mut processing = HashSet::new();
        self.build(type_name, &mut processing)
    }

    fn build(
        &self,
        type_name: &TypeName,
        processing: &mut HashSet<TypeName>,
    ) -> Result<TypeMetadata, InspectionError> {
        if !processing.insert(type_name.clone()) {
            return Err(InspectionError::CircularInheritance {
                type_name: type_name.clone(),
                origin: self.origin(),
            });
        }
        let schema = self
            .schema
            .type_schema(type_name)
            .ok_or_else(|| InspectionError::UnknownType {
                type_name: type_name.clone(),
                origin: self.origin(),
            })?;

        let mut seen = HashSet::new();
        let mut properties = Vec::with_capacity(schema.properties().len());
        for decl in schema.properties() {
            let Some(property) = self.build_property(type_name, decl)? else {
                continue;
            };
            if seen.insert(property.name.clone()) {
                properties.push(Arc::new(property));
            }
        }

        if let Some(parent) = schema.parent() {
            let inherited = self.build(parent, processing)?;
            for property in inherited.properties {
                if seen.insert(property.name.clone()) {
                    properties.push(property);
                }
            }
        }

        let corrections = self.collect_corrections(type_name, CLASS_LEVEL, schema.annotations().iter())?;
        processing.remove(type_name);

        Ok(TypeMetadata {
            type_name: type_name.clone(),
            corrections,
            properties,
            origin: self.origin(),
        })
    }

    fn build_property(
        &self,
        owner: &TypeName,
        decl: &PropertyDecl,
    ) -> Result<Option<PropertyMetadata>, InspectionError> {
        // Write-only properties are invisible.
        if !decl.is_readable() {
            return Ok(None);
        }
        let corrections = self.collect_corrections(owner, decl.name(), decl.annotations())?;
        let mut modifiers = Vec::new();
        if decl
            .annotations()
            .any(|a| matches!(a, Annotation::CorrectNested))
        {
            modifiers.push(TraversalModifier::CorrectNested);
        }
        Ok(Some(PropertyMetadata {
            name: decl.name().to_string(),
            declared_type: decl.declared_type().clone(),
            corrections,
            modifiers,
            readable: decl.is_readable(),
            writable: decl.is_writable(),
            origin: self.origin(),
        }))
    }

    fn collect_corrections<'a>(
        &self,
        owner: &TypeName,
        property: &str,
        annotations: impl Iterator<Item = &'a Annotation>,
    ) -> Result<Vec<CorrectionDescriptor>, InspectionError> {
        let mut seen = HashSet::new();
        let mut corrections = Vec::new();
        for descriptor in annotations.filter_map(Annotation::as_correction) {
            if !seen.insert(descriptor.annotation_type()) {
                continue;
            }
            self.check_enum_default(owner, property, descriptor)?;
            corrections.push(descriptor.clone());
        }
        Ok(corrections)
    }

    fn check_enum_default(
        &self,
        owner: &TypeName,
        property: &str,
        descriptor: &CorrectionDescriptor,
    ) -> Result<(), InspectionError> {
        let CorrectionSpec::DefaultValue(default) = descriptor.spec() else {
            return Ok(());
        };
        let Some(literal) = &default.enum_value else {
            return Ok(());
        };
        if literal.variant.trim().is_empty() {
            return Ok(());
        }
        let declared = self
            .schema
            .enum_schema(&literal.enum_type)
            .is_some_and(|e| e.has_variant(&literal.variant));
        if declared {
            Ok(())
        } else {
            Err(InspectionError::InvalidEnumDefault {
                owner: owner.clone(),
                property: property.to_string(),
                enum_type: literal.enum_type.clone(),
                variant: literal.variant.clone(),
                origin: self.origin(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amend_api::{
        CorrectionTarget, DefaultValue, EnumSchema, PrimitiveKind, TypeDescriptor, TypeSchema,
    };

    fn inspector(schema: Schema) -> SchemaInspector {
        SchemaInspector::new(Arc::new(schema))
    }

    #[test]
    fn unions_sites_and_dedups_by_annotation_type() {
        let schema = Schema::builder()
            .ty(TypeSchema::new("Person").property(
                PropertyDecl::new("name", TypeDescriptor::String)
                    .on_getter(CorrectionDescriptor::trim().in_groups(["Slough"]))
                    .on_field(CorrectionDescriptor::trim())
                    .on_field(CorrectionDescriptor::truncate(3))
                    .on_setter(Annotation::marker("NotBlank")),
            ))
            .build();
        let metadata = inspector(schema).inspect(&"Person".into()).unwrap();
        let name = metadata.property("name").unwrap();

        let types: Vec<_> = name
            .corrections()
            .iter()
            .map(|c| c.annotation_type().as_str().to_string())
            .collect();
        assert_eq!(types, vec!["Trim", "Truncate"]);
        // getter site came first
        assert_eq!(name.corrections()[0].groups().len(), 1);
    }

    #[test]
    fn subclass_shadows_superclass_property() {
        let schema = Schema::builder()
            .ty(TypeSchema::new("Asset")
                .property(PropertyDecl::new("name", TypeDescriptor::String))
                .property(PropertyDecl::new("serial", TypeDescriptor::String)))
            .ty(TypeSchema::new("Printer")
                .extends("Asset")
                .property(
                    PropertyDecl::new("name", TypeDescriptor::String)
                        .on_field(CorrectionDescriptor::trim()),
                ))
            .build();
        let metadata = inspector(schema).inspect(&"Printer".into()).unwrap();
        let names: Vec<_> = metadata.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["name", "serial"]);
        assert_eq!(metadata.property("name").unwrap().corrections().len(), 1);
    }

    #[test]
    fn circular_inheritance_is_rejected() {
        let schema = Schema::builder()
            .ty(TypeSchema::new("A").extends("B"))
            .ty(TypeSchema::new("B").extends("A"))
            .build();
        let err = inspector(schema).inspect(&"A".into()).unwrap_err();
        assert!(matches!(err, InspectionError::CircularInheritance { .. }));
        assert_eq!(err.origin(), ConfigurationSource::Schema);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = inspector(Schema::builder().build())
            .inspect(&"Ghost".into())
            .unwrap_err();
        assert!(matches!(err, InspectionError::UnknownType { .. }));
    }

    #[test]
    fn accessors_and_modifiers() {
        let schema = Schema::builder()
            .ty(TypeSchema::new("Branch")
                .property(PropertyDecl::new("manager", TypeDescriptor::bean("Person")).nested())
                .property(
                    PropertyDecl::new("code", TypeDescriptor::String).without_setter(),
                )
                .property(
                    PropertyDecl::new("computed", TypeDescriptor::String)
                        .without_field()
                        .without_setter()
                        .on_getter(CorrectionDescriptor::trim()),
                )
                .property(PropertyDecl::field("floor", TypeDescriptor::Primitive(PrimitiveKind::I32))))
            .ty(TypeSchema::new("Person"))
            .build();
        let metadata = inspector(schema).inspect(&"Branch".into()).unwrap();

        assert!(metadata.property("manager").unwrap().is_nested());
        assert!(!metadata.property("code").unwrap().is_writable());
        assert!(!metadata.property("computed").unwrap().is_writable());
        assert!(metadata.property("computed").unwrap().is_readable());
        assert!(metadata.property("floor").unwrap().is_writable());
    }

    #[test]
    fn class_level_corrections() {
        let schema = Schema::builder()
            .ty(TypeSchema::new("Money")
                .annotate(CorrectionDescriptor::trim().with_target(CorrectionTarget::Property))
                .annotate(Annotation::marker("ValidMoney")))
            .build();
        let metadata = inspector(schema).inspect(&"Money".into()).unwrap();
        assert_eq!(metadata.corrections().len(), 1);
    }

    #[test]
    fn enum_default_must_be_declared() {
        let build = |variant: &str| {
            Schema::builder()
                .enumeration(EnumSchema::new("Department", ["SALES"]))
                .ty(TypeSchema::new("Person").property(
                    PropertyDecl::new("department", TypeDescriptor::enumeration("Department"))
                        .on_field(CorrectionDescriptor::default_value(DefaultValue::enumeration(
                            "Department",
                            variant,
                        ))),
                ))
                .build()
        };
        assert!(inspector(build("SALES")).inspect(&"Person".into()).is_ok());
        let err = inspector(build("HR")).inspect(&"Person".into()).unwrap_err();
        assert!(matches!(err, InspectionError::InvalidEnumDefault { .. }));
    }
}
