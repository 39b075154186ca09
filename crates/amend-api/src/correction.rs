//! Correction specs and descriptors
//!
//! A [`CorrectionSpec`] is the typed configuration of one correction kind.
//! A [`CorrectionDescriptor`] attaches a spec to a property, container
//! element or bean, scoped by groups and optionally filtered by constraint
//! violations.

use crate::applier::ApplierDeclaration;
use crate::group::GroupId;
use crate::value::{EnumValue, Value};
use crate::violation::ConstraintType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

/// Identity of a correction kind
///
/// Two descriptors with the same annotation type on one node are
/// duplicates; only the first is kept.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnnotationType(String);

impl AnnotationType {
    /// Built-in whitespace trim
    pub const TRIM: &'static str = "Trim";
    /// Built-in length truncation
    pub const TRUNCATE: &'static str = "Truncate";
    /// Built-in regex replacement
    pub const REGEX_REPLACE: &'static str = "RegexReplace";
    /// Built-in default value substitution
    pub const DEFAULT_VALUE: &'static str = "DefaultValue";

    /// Create new annotation type
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AnnotationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationType {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Opaque payload marker carried through to applied corrections
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayloadId(String);

impl PayloadId {
    /// Create new payload marker
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<&str> for PayloadId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Where a correction fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CorrectionTarget {
    /// The property (or bean) value itself
    #[default]
    Property,

    /// Each element inside the property's container
    ContainerElement,
}

/// Literals substituted by the default-value correction
///
/// One literal per kind; the applier matching the value's type picks its
/// own literal.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    pub str_value: String,
    pub int_value: i32,
    pub long_value: i64,
    pub double_value: f64,
    pub float_value: f32,
    pub bool_value: bool,
    pub char_value: char,
    pub byte_value: i8,
    pub short_value: i16,
    pub enum_value: Option<EnumValue>,
}

impl Default for DefaultValue {
    fn default() -> Self {
        Self {
            str_value: String::new(),
            int_value: 0,
            long_value: 0,
            double_value: 0.0,
            float_value: 0.0,
            bool_value: false,
            char_value: '\0',
            byte_value: 0,
            short_value: 0,
            enum_value: None,
        }
    }
}

impl DefaultValue {
    /// String literal
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            str_value: value.into(),
            ..Self::default()
        }
    }

    /// 32-bit integer literal
    #[must_use]
    pub fn int(value: i32) -> Self {
        Self {
            int_value: value,
            ..Self::default()
        }
    }

    /// 64-bit integer literal
    #[must_use]
    pub fn long(value: i64) -> Self {
        Self {
            long_value: value,
            ..Self::default()
        }
    }

    /// Double literal
    #[must_use]
    pub fn double(value: f64) -> Self {
        Self {
            double_value: value,
            ..Self::default()
        }
    }

    /// Float literal
    #[must_use]
    pub fn float(value: f32) -> Self {
        Self {
            float_value: value,
            ..Self::default()
        }
    }

    /// Boolean literal
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self {
            bool_value: value,
            ..Self::default()
        }
    }

    /// Char literal
    #[must_use]
    pub fn character(value: char) -> Self {
        Self {
            char_value: value,
            ..Self::default()
        }
    }

    /// Byte literal
    #[must_use]
    pub fn byte(value: i8) -> Self {
        Self {
            byte_value: value,
            ..Self::default()
        }
    }

    /// Short literal
    #[must_use]
    pub fn short(value: i16) -> Self {
        Self {
            short_value: value,
            ..Self::default()
        }
    }

    /// Enum literal
    #[must_use]
    pub fn enumeration(enum_type: &str, variant: &str) -> Self {
        Self {
            enum_value: Some(EnumValue::new(enum_type, variant)),
            ..Self::default()
        }
    }
}

/// Declaration of a correction kind and the appliers backing it
///
/// Custom corrections carry their applier list here; the engine searches it
/// for an applier whose value type matches the value being corrected.
pub struct CorrectionDefinition {
    annotation_type: AnnotationType,
    corrected_by: Vec<ApplierDeclaration>,
}

impl CorrectionDefinition {
    /// Create new definition
    #[must_use]
    pub fn new(annotation_type: impl Into<AnnotationType>, corrected_by: Vec<ApplierDeclaration>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            corrected_by,
        }
    }

    /// Annotation type
    #[inline]
    #[must_use]
    pub fn annotation_type(&self) -> &AnnotationType {
        &self.annotation_type
    }

    /// Declared appliers, in declaration order
    #[inline]
    #[must_use]
    pub fn corrected_by(&self) -> &[ApplierDeclaration] {
        &self.corrected_by
    }
}

impl Debug for CorrectionDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrectionDefinition")
            .field("annotation_type", &self.annotation_type)
            .field("corrected_by", &self.corrected_by)
            .finish()
    }
}

/// Typed configuration of a correction
#[derive(Debug, Clone)]
pub enum CorrectionSpec {
    /// Strip leading and trailing whitespace
    Trim,

    /// Limit string length
    Truncate {
        /// Maximum length in chars
        length: usize,
        /// Keep the head (`true`) or the tail (`false`)
        from_end: bool,
    },

    /// Replace every match of `pattern` with `replacement`
    RegexReplace { pattern: String, replacement: String },

    /// Substitute a literal for null values
    DefaultValue(DefaultValue),

    /// Domain-specific correction backed by its own appliers
    Custom {
        definition: Arc<CorrectionDefinition>,
        attributes: IndexMap<String, Value>,
    },
}

impl CorrectionSpec {
    /// Annotation type identifying this correction kind
    #[must_use]
    pub fn annotation_type(&self) -> AnnotationType {
        match self {
            Self::Trim => AnnotationType::new(AnnotationType::TRIM),
            Self::Truncate { .. } => AnnotationType::new(AnnotationType::TRUNCATE),
            Self::RegexReplace { .. } => AnnotationType::new(AnnotationType::REGEX_REPLACE),
            Self::DefaultValue(_) => AnnotationType::new(AnnotationType::DEFAULT_VALUE),
            Self::Custom { definition, .. } => definition.annotation_type().clone(),
        }
    }

    /// Appliers declared by the correction kind itself
    ///
    /// Built-in kinds declare none; they are served by the seeded registry.
    #[must_use]
    pub fn corrected_by(&self) -> &[ApplierDeclaration] {
        match self {
            Self::Custom { definition, .. } => definition.corrected_by(),
            _ => &[],
        }
    }

    /// Attribute of a custom correction
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Custom { attributes, .. } => attributes.get(name),
            _ => None,
        }
    }
}

/// A correction attached to a node
#[derive(Debug, Clone)]
pub struct CorrectionDescriptor {
    spec: CorrectionSpec,
    target: Option<CorrectionTarget>,
    groups: BTreeSet<GroupId>,
    payload: BTreeSet<PayloadId>,
    constraint_filter: BTreeSet<ConstraintType>,
}

impl CorrectionDescriptor {
    /// Descriptor for `spec` in the default group, no target override
    #[must_use]
    pub fn new(spec: CorrectionSpec) -> Self {
        Self {
            spec,
            target: None,
            groups: BTreeSet::new(),
            payload: BTreeSet::new(),
            constraint_filter: BTreeSet::new(),
        }
    }

    /// Trim correction
    #[must_use]
    pub fn trim() -> Self {
        Self::new(CorrectionSpec::Trim)
    }

    /// Truncate correction keeping the first `length` chars
    #[must_use]
    pub fn truncate(length: usize) -> Self {
        Self::new(CorrectionSpec::Truncate {
            length,
            from_end: true,
        })
    }

    /// Regex replacement correction
    #[must_use]
    pub fn regex_replace(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::new(CorrectionSpec::RegexReplace {
            pattern: pattern.into(),
            replacement: replacement.into(),
        })
    }

    /// Default value correction
    #[must_use]
    pub fn default_value(value: DefaultValue) -> Self {
        Self::new(CorrectionSpec::DefaultValue(value))
    }

    /// Custom correction
    #[must_use]
    pub fn custom(definition: &Arc<CorrectionDefinition>, attributes: IndexMap<String, Value>) -> Self {
        Self::new(CorrectionSpec::Custom {
            definition: Arc::clone(definition),
            attributes,
        })
    }

    /// Restrict to groups
    #[must_use]
    pub fn in_groups<I, G>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GroupId>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Set explicit target
    #[must_use]
    pub fn with_target(mut self, target: CorrectionTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Attach payload markers
    #[must_use]
    pub fn with_payload<I, P>(mut self, payload: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PayloadId>,
    {
        self.payload = payload.into_iter().map(Into::into).collect();
        self
    }

    /// Only fire on nodes with a violation of one of these constraints
    #[must_use]
    pub fn filtered_by<I, C>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ConstraintType>,
    {
        self.constraint_filter = constraints.into_iter().map(Into::into).collect();
        self
    }

    /// Typed configuration
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &CorrectionSpec {
        &self.spec
    }

    /// Annotation type (de-duplication key)
    #[inline]
    #[must_use]
    pub fn annotation_type(&self) -> AnnotationType {
        self.spec.annotation_type()
    }

    /// Explicit target, if declared
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<CorrectionTarget> {
        self.target
    }

    /// Groups this correction is scoped to; empty means the default group
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &BTreeSet<GroupId> {
        &self.groups
    }

    /// Payload markers
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &BTreeSet<PayloadId> {
        &self.payload
    }

    /// Constraint filter
    #[inline]
    #[must_use]
    pub fn constraint_filter(&self) -> &BTreeSet<ConstraintType> {
        &self.constraint_filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptor;

    #[test]
    fn builtin_annotation_types() {
        assert_eq!(CorrectionDescriptor::trim().annotation_type().as_str(), "Trim");
        assert_eq!(
            CorrectionDescriptor::truncate(3).annotation_type().as_str(),
            "Truncate"
        );
        assert_eq!(
            CorrectionDescriptor::default_value(DefaultValue::int(1))
                .annotation_type()
                .as_str(),
            "DefaultValue"
        );
        assert!(CorrectionSpec::Trim.corrected_by().is_empty());
    }

    #[test]
    fn custom_spec_exposes_definition() {
        let definition = Arc::new(CorrectionDefinition::new(
            "MoneyCorrection",
            vec![ApplierDeclaration::from_fn(
                "noop",
                TypeDescriptor::bean("Money"),
                |_, _| Ok(crate::applier::ApplierOutcome::NoChange),
            )],
        ));
        let mut attributes = IndexMap::new();
        attributes.insert("defaultCurrency".to_string(), Value::from("GBP"));
        let descriptor = CorrectionDescriptor::custom(&definition, attributes);

        assert_eq!(descriptor.annotation_type().as_str(), "MoneyCorrection");
        assert_eq!(descriptor.spec().corrected_by().len(), 1);
        assert_eq!(
            descriptor.spec().attribute("defaultCurrency"),
            Some(&Value::from("GBP"))
        );
    }

    #[test]
    fn descriptor_builders() {
        let descriptor = CorrectionDescriptor::trim()
            .in_groups(["Branch"])
            .with_target(CorrectionTarget::ContainerElement)
            .with_payload(["Audit"])
            .filtered_by(["NotBlank"]);

        assert!(descriptor.groups().contains(&GroupId::from("Branch")));
        assert_eq!(descriptor.target(), Some(CorrectionTarget::ContainerElement));
        assert_eq!(descriptor.payload().len(), 1);
        assert!(descriptor
            .constraint_filter()
            .contains(&ConstraintType::from("NotBlank")));
    }

    #[test]
    fn default_value_constructors_leave_other_literals_default() {
        let value = DefaultValue::int(2001);
        assert_eq!(value.int_value, 2001);
        assert_eq!(value.str_value, "");
        assert!(value.enum_value.is_none());
    }
}
