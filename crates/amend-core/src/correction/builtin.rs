//! Built-in correction appliers
//!
//! String corrections (trim, truncate, regex replace) and default-value
//! substitution for every scalar kind, string and enum.

use amend_api::{
    AnnotationType, ApplierContext, ApplierDeclaration, ApplierOutcome, CorrectionApplier,
    CorrectionError, CorrectionSpec, DefaultValue, EnumValue, PrimitiveKind, TypeDescriptor, Value,
};
use regex::Regex;

fn unsupported(applier: &str, spec: &CorrectionSpec) -> CorrectionError {
    CorrectionError::UnsupportedSpec {
        applier: applier.to_string(),
        annotation: spec.annotation_type(),
    }
}

/// Borrow a string value; `None` for null
fn string_value<'a>(applier: &str, value: &'a Value) -> Result<Option<&'a str>, CorrectionError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(CorrectionError::UnexpectedValue {
            applier: applier.to_string(),
            expected: "string".to_string(),
            actual: other.kind_name().to_string(),
        }),
    }
}

fn edit_if_changed(old: &str, new: String) -> ApplierOutcome {
    if new == old {
        ApplierOutcome::NoChange
    } else {
        ApplierOutcome::edited(Value::from(old), Value::String(new))
    }
}

/// Strips leading and trailing whitespace
#[derive(Debug, Default)]
pub struct TrimApplier;

impl TrimApplier {
    /// Registry name
    pub const NAME: &'static str = "TrimApplier";
}

impl CorrectionApplier for TrimApplier {
    fn correct(
        &self,
        value: &Value,
        _context: &ApplierContext<'_>,
    ) -> Result<ApplierOutcome, CorrectionError> {
        Ok(match string_value(Self::NAME, value)? {
            Some(s) => edit_if_changed(s, s.trim().to_string()),
            None => ApplierOutcome::NoChange,
        })
    }
}

/// Limits string length in chars
#[derive(Debug)]
pub struct TruncateApplier {
    length: usize,
    from_end: bool,
}

impl TruncateApplier {
    /// Registry name
    pub const NAME: &'static str = "TruncateApplier";
}

impl Default for TruncateApplier {
    fn default() -> Self {
        Self {
            length: usize::MAX,
            from_end: true,
        }
    }
}

impl CorrectionApplier for TruncateApplier {
    fn initialize(&mut self, spec: &CorrectionSpec) -> Result<(), CorrectionError> {
        let CorrectionSpec::Truncate { length, from_end } = spec else {
            return Err(unsupported(Self::NAME, spec));
        };
        self.length = *length;
        self.from_end = *from_end;
        Ok(())
    }

    fn correct(
        &self,
        value: &Value,
        _context: &ApplierContext<'_>,
    ) -> Result<ApplierOutcome, CorrectionError> {
        let Some(s) = string_value(Self::NAME, value)? else {
            return Ok(ApplierOutcome::NoChange);
        };
        let count = s.chars().count();
        if count <= self.length {
            return Ok(ApplierOutcome::NoChange);
        }
        // `from_end` keeps the head and drops the excess at the end.
        let truncated: String = if self.from_end {
            s.chars().take(self.length).collect()
        } else {
            s.chars().skip(count - self.length).collect()
        };
        Ok(ApplierOutcome::edited(Value::from(s), Value::String(truncated)))
    }
}

/// Replaces every match of a pattern
#[derive(Debug, Default)]
pub struct RegexReplaceApplier {
    pattern: Option<Regex>,
    replacement: String,
}

impl RegexReplaceApplier {
    /// Registry name
    pub const NAME: &'static str = "RegexReplaceApplier";
}

impl CorrectionApplier for RegexReplaceApplier {
    fn initialize(&mut self, spec: &CorrectionSpec) -> Result<(), CorrectionError> {
        let CorrectionSpec::RegexReplace {
            pattern,
            replacement,
        } = spec
        else {
            return Err(unsupported(Self::NAME, spec));
        };
        let regex = Regex::new(pattern).map_err(|e| CorrectionError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        self.pattern = Some(regex);
        self.replacement.clone_from(replacement);
        Ok(())
    }

    fn correct(
        &self,
        value: &Value,
        _context: &ApplierContext<'_>,
    ) -> Result<ApplierOutcome, CorrectionError> {
        let Some(s) = string_value(Self::NAME, value)? else {
            return Ok(ApplierOutcome::NoChange);
        };
        let pattern = self
            .pattern
            .as_ref()
            .ok_or_else(|| CorrectionError::failed("regex replace used before initialization"))?;
        let replaced = pattern.replace_all(s, self.replacement.as_str());
        Ok(edit_if_changed(s, replaced.into_owned()))
    }
}

/// Literal kind a [`DefaultValueApplier`] substitutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultKind {
    String,
    Scalar(PrimitiveKind),
}

impl DefaultKind {
    fn literal(self, defaults: &DefaultValue) -> Value {
        match self {
            Self::String => Value::from(defaults.str_value.as_str()),
            Self::Scalar(kind) => match kind {
                PrimitiveKind::Bool => Value::Bool(defaults.bool_value),
                PrimitiveKind::Char => Value::Char(defaults.char_value),
                PrimitiveKind::I8 => Value::I8(defaults.byte_value),
                PrimitiveKind::I16 => Value::I16(defaults.short_value),
                PrimitiveKind::I32 => Value::I32(defaults.int_value),
                PrimitiveKind::I64 => Value::I64(defaults.long_value),
                PrimitiveKind::F32 => Value::F32(defaults.float_value),
                PrimitiveKind::F64 => Value::F64(defaults.double_value),
            },
        }
    }

    fn value_type(self) -> TypeDescriptor {
        match self {
            Self::String => TypeDescriptor::String,
            Self::Scalar(kind) => TypeDescriptor::Primitive(kind),
        }
    }
}

/// Substitutes the configured literal for null scalars and strings
#[derive(Debug)]
pub struct DefaultValueApplier {
    kind: DefaultKind,
    literal: Option<Value>,
}

impl DefaultValueApplier {
    /// Registry name
    pub const NAME: &'static str = "DefaultValueApplier";

    /// Applier for one literal kind
    #[must_use]
    pub fn new(kind: DefaultKind) -> Self {
        Self {
            kind,
            literal: None,
        }
    }
}

impl CorrectionApplier for DefaultValueApplier {
    fn initialize(&mut self, spec: &CorrectionSpec) -> Result<(), CorrectionError> {
        let CorrectionSpec::DefaultValue(defaults) = spec else {
            return Err(unsupported(Self::NAME, spec));
        };
        self.literal = Some(self.kind.literal(defaults));
        Ok(())
    }

    fn correct(
        &self,
        value: &Value,
        _context: &ApplierContext<'_>,
    ) -> Result<ApplierOutcome, CorrectionError> {
        match (&self.literal, value) {
            (Some(literal), Value::Null) => Ok(ApplierOutcome::edited(Value::Null, literal.clone())),
            _ => Ok(ApplierOutcome::NoChange),
        }
    }
}

/// Substitutes the configured enum literal for null enums
///
/// Serves every enum type regardless of the correction kind; anything other
/// than a default-value correction fails at initialization.
#[derive(Debug, Default)]
pub struct EnumDefaultValueApplier {
    literal: Option<EnumValue>,
}

impl EnumDefaultValueApplier {
    /// Registry name
    pub const NAME: &'static str = "EnumDefaultValueApplier";
}

impl CorrectionApplier for EnumDefaultValueApplier {
    fn initialize(&mut self, spec: &CorrectionSpec) -> Result<(), CorrectionError> {
        let CorrectionSpec::DefaultValue(defaults) = spec else {
            return Err(unsupported(Self::NAME, spec));
        };
        self.literal = defaults
            .enum_value
            .clone()
            .filter(|e| !e.variant.trim().is_empty());
        Ok(())
    }

    fn correct(
        &self,
        value: &Value,
        _context: &ApplierContext<'_>,
    ) -> Result<ApplierOutcome, CorrectionError> {
        match (&self.literal, value) {
            (Some(literal), Value::Null) => Ok(ApplierOutcome::edited(
                Value::Null,
                Value::Enum(literal.clone()),
            )),
            _ => Ok(ApplierOutcome::NoChange),
        }
    }
}

/// Declaration of the shared enum applier
#[must_use]
pub fn enum_default_declaration(enum_type: TypeDescriptor) -> ApplierDeclaration {
    ApplierDeclaration::of::<EnumDefaultValueApplier>(EnumDefaultValueApplier::NAME, enum_type)
}

/// Seed table: `(annotation type, value type, applier)`
#[must_use]
pub fn builtin_appliers() -> Vec<(AnnotationType, ApplierDeclaration)> {
    let string = TypeDescriptor::String;
    let mut seeds = vec![
        (
            AnnotationType::new(AnnotationType::TRIM),
            ApplierDeclaration::of::<TrimApplier>(TrimApplier::NAME, string.clone()),
        ),
        (
            AnnotationType::new(AnnotationType::TRUNCATE),
            ApplierDeclaration::of::<TruncateApplier>(TruncateApplier::NAME, string.clone()),
        ),
        (
            AnnotationType::new(AnnotationType::REGEX_REPLACE),
            ApplierDeclaration::of::<RegexReplaceApplier>(RegexReplaceApplier::NAME, string),
        ),
    ];
    let kinds = std::iter::once(DefaultKind::String)
        .chain(PrimitiveKind::ALL.into_iter().map(DefaultKind::Scalar));
    for kind in kinds {
        seeds.push((
            AnnotationType::new(AnnotationType::DEFAULT_VALUE),
            ApplierDeclaration::new(DefaultValueApplier::NAME, kind.value_type(), move || {
                DefaultValueApplier::new(kind)
            }),
        ));
    }
    seeds
}
