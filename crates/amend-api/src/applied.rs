//! Record of a successful mutation

use crate::correction::CorrectionDescriptor;
use crate::path::Path;
use crate::value::Value;
use std::fmt::{self, Display, Formatter};

/// One correction that changed the graph
///
/// Created exactly once per write that took effect, in traversal order.
#[derive(Debug, Clone)]
pub struct AppliedCorrection {
    root: Value,
    path: Path,
    old_value: Value,
    new_value: Value,
    descriptor: CorrectionDescriptor,
}

impl AppliedCorrection {
    /// Create new record
    #[must_use]
    pub fn new(
        root: Value,
        path: Path,
        old_value: Value,
        new_value: Value,
        descriptor: CorrectionDescriptor,
    ) -> Self {
        Self {
            root,
            path,
            old_value,
            new_value,
            descriptor,
        }
    }

    /// Root of the corrected graph
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Path of the corrected node
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value before the correction
    #[inline]
    #[must_use]
    pub fn old_value(&self) -> &Value {
        &self.old_value
    }

    /// Value after the correction
    #[inline]
    #[must_use]
    pub fn new_value(&self) -> &Value {
        &self.new_value
    }

    /// Correction that produced this change
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &CorrectionDescriptor {
        &self.descriptor
    }
}

impl Display for AppliedCorrection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at '{}': {} -> {}",
            self.descriptor.annotation_type(),
            self.path,
            self.old_value,
            self.new_value
        )
    }
}
