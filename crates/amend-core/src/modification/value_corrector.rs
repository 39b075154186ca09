//! Single-value correction through the registry

use crate::correction::CorrectionApplierRegistry;
use crate::error::CorrectorError;
use amend_api::{ApplierContext, ApplierOutcome, CorrectionDescriptor, TypeDescriptor, Value};
use std::sync::Arc;

/// Looks up, instantiates, initializes and runs the applier for one value
#[derive(Debug, Clone)]
pub struct ValueCorrector {
    registry: Arc<CorrectionApplierRegistry>,
}

impl ValueCorrector {
    #[must_use]
    pub fn new(registry: Arc<CorrectionApplierRegistry>) -> Self {
        Self { registry }
    }

    /// Apply `descriptor` to `value`, dispatching on `value_type`
    ///
    /// A correction with no applier for the type is no change. Appliers are
    /// instantiated fresh for every call.
    ///
    /// # Errors
    /// Returns [`CorrectorError::Correction`] if initialization or the
    /// correction itself fails.
    pub fn correct(
        &self,
        descriptor: &CorrectionDescriptor,
        value_type: &TypeDescriptor,
        value: &Value,
        context: &ApplierContext<'_>,
    ) -> Result<ApplierOutcome, CorrectorError> {
        let annotation = descriptor.annotation_type();
        let Some(declaration) = self.registry.provide(descriptor, value_type) else {
            tracing::trace!(%annotation, %value_type, "no applier for type");
            return Ok(ApplierOutcome::NoChange);
        };
        let mut applier = declaration.instantiate();
        applier
            .initialize(descriptor.spec())
            .map_err(|e| CorrectorError::correction(annotation.clone(), e))?;
        applier
            .correct(value, context)
            .map_err(|e| CorrectorError::correction(annotation, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amend_api::{CorrectionError, DefaultValue, EnumValue, PrimitiveKind};

    fn corrector() -> ValueCorrector {
        ValueCorrector::new(Arc::new(CorrectionApplierRegistry::with_defaults()))
    }

    #[test]
    fn trims_strings() {
        let root = Value::Null;
        let outcome = corrector()
            .correct(
                &CorrectionDescriptor::trim(),
                &TypeDescriptor::String,
                &Value::from(" hi "),
                &ApplierContext::new(&root, None),
            )
            .unwrap();
        assert_eq!(outcome, ApplierOutcome::edited(Value::from(" hi "), Value::from("hi")));
    }

    #[test]
    fn missing_applier_is_no_change() {
        let root = Value::Null;
        let outcome = corrector()
            .correct(
                &CorrectionDescriptor::trim(),
                &TypeDescriptor::Primitive(PrimitiveKind::Bool),
                &Value::Bool(true),
                &ApplierContext::new(&root, None),
            )
            .unwrap();
        assert_eq!(outcome, ApplierOutcome::NoChange);
    }

    #[test]
    fn enum_default_dispatches_on_enum_type() {
        let root = Value::Null;
        let outcome = corrector()
            .correct(
                &CorrectionDescriptor::default_value(DefaultValue::enumeration("Department", "SALES")),
                &TypeDescriptor::enumeration("Department"),
                &Value::Null,
                &ApplierContext::new(&root, None),
            )
            .unwrap();
        assert_eq!(
            outcome,
            ApplierOutcome::edited(Value::Null, Value::Enum(EnumValue::new("Department", "SALES")))
        );
    }

    #[test]
    fn invalid_pattern_fails_initialization() {
        let root = Value::Null;
        let err = corrector()
            .correct(
                &CorrectionDescriptor::regex_replace("(", ""),
                &TypeDescriptor::String,
                &Value::from("x"),
                &ApplierContext::new(&root, None),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CorrectorError::Correction {
                source: CorrectionError::InvalidPattern { .. },
                ..
            }
        ));
    }
}
