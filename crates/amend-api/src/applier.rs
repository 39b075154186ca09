//! Correction applier seam
//!
//! A [`CorrectionApplier`] is the executable half of a correction: it is
//! created fresh for every application, initialized with the correction's
//! spec, and asked to correct one value.

use crate::correction::{AnnotationType, CorrectionSpec};
use crate::types::TypeDescriptor;
use crate::value::{BeanRef, Value};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by correction appliers
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CorrectionError {
    /// Applier was initialized with a spec it cannot handle
    #[error("applier '{applier}' does not support '{annotation}' corrections")]
    UnsupportedSpec {
        applier: String,
        annotation: AnnotationType,
    },

    /// Regex pattern failed to compile
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Value shape does not match what the applier handles
    #[error("applier '{applier}' expected {expected} but got {actual}")]
    UnexpectedValue {
        applier: String,
        expected: String,
        actual: String,
    },

    /// Domain-specific failure
    #[error("{0}")]
    Failed(String),
}

impl CorrectionError {
    /// Domain-specific failure with a message
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Context handed to an applier alongside the value
#[derive(Debug, Clone, Copy)]
pub struct ApplierContext<'a> {
    root: &'a Value,
    leaf: Option<&'a BeanRef>,
}

impl<'a> ApplierContext<'a> {
    /// Create new context
    #[inline]
    #[must_use]
    pub fn new(root: &'a Value, leaf: Option<&'a BeanRef>) -> Self {
        Self { root, leaf }
    }

    /// Root of the graph under correction
    #[inline]
    #[must_use]
    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// Bean owning the value being corrected, if any
    #[inline]
    #[must_use]
    pub fn leaf(&self) -> Option<&'a BeanRef> {
        self.leaf
    }
}

/// Result of correcting one value
#[derive(Debug, Clone, PartialEq)]
pub enum ApplierOutcome {
    /// Value is already in canonical form
    NoChange,

    /// Value should be replaced
    Edited { old: Value, new: Value },
}

impl ApplierOutcome {
    /// Edited outcome
    #[inline]
    #[must_use]
    pub fn edited(old: Value, new: Value) -> Self {
        Self::Edited { old, new }
    }

    /// Check if this outcome carries an edit
    #[inline]
    #[must_use]
    pub fn is_edited(&self) -> bool {
        matches!(self, Self::Edited { .. })
    }
}

/// Executable correction logic
pub trait CorrectionApplier: Send {
    /// Configure from the correction spec; called once before `correct`
    fn initialize(&mut self, spec: &CorrectionSpec) -> Result<(), CorrectionError> {
        let _ = spec;
        Ok(())
    }

    /// Correct `value`
    fn correct(
        &self,
        value: &Value,
        context: &ApplierContext<'_>,
    ) -> Result<ApplierOutcome, CorrectionError>;
}

/// Factory creating a fresh applier instance
pub type ApplierFactory = Arc<dyn Fn() -> Box<dyn CorrectionApplier> + Send + Sync>;

type CorrectFn =
    dyn Fn(&Value, &ApplierContext<'_>) -> Result<ApplierOutcome, CorrectionError> + Send + Sync;

/// Applier wrapping a stateless closure
struct FnApplier(Arc<CorrectFn>);

impl CorrectionApplier for FnApplier {
    fn correct(
        &self,
        value: &Value,
        context: &ApplierContext<'_>,
    ) -> Result<ApplierOutcome, CorrectionError> {
        (self.0)(value, context)
    }
}

/// An applier type together with the value type it corrects
///
/// The value type is what registry dispatch matches against.
#[derive(Clone)]
pub struct ApplierDeclaration {
    name: String,
    value_type: TypeDescriptor,
    factory: ApplierFactory,
}

impl ApplierDeclaration {
    /// Declare an applier built by `factory`
    pub fn new<A, F>(name: impl Into<String>, value_type: TypeDescriptor, factory: F) -> Self
    where
        A: CorrectionApplier + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            value_type,
            factory: Arc::new(move || Box::new(factory()) as Box<dyn CorrectionApplier>),
        }
    }

    /// Declare a `Default`-constructible applier
    #[must_use]
    pub fn of<A>(name: impl Into<String>, value_type: TypeDescriptor) -> Self
    where
        A: CorrectionApplier + Default + 'static,
    {
        Self::new(name, value_type, A::default)
    }

    /// Declare a stateless applier from a closure
    pub fn from_fn<F>(name: impl Into<String>, value_type: TypeDescriptor, correct: F) -> Self
    where
        F: Fn(&Value, &ApplierContext<'_>) -> Result<ApplierOutcome, CorrectionError>
            + Send
            + Sync
            + 'static,
    {
        let correct: Arc<CorrectFn> = Arc::new(correct);
        Self::new(name, value_type, move || FnApplier(Arc::clone(&correct)))
    }

    /// Applier name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value type this applier corrects
    #[inline]
    #[must_use]
    pub fn value_type(&self) -> &TypeDescriptor {
        &self.value_type
    }

    /// Create a fresh, uninitialized applier
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn CorrectionApplier> {
        (self.factory)()
    }
}

impl Debug for ApplierDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplierDeclaration")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .finish_non_exhaustive()
    }
}
