//! Externally supplied constraint violations
//!
//! Violations are consumed read-only: a rendered path string and the type of
//! the constraint that failed there.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Type of a validation constraint (e.g. `NotNull`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintType(String);

impl ConstraintType {
    /// Create new constraint type
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

impl Display for ConstraintType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConstraintType {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// A failed constraint at a structural path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    /// Rendered path, e.g. `branch.establishedYear`
    pub path: String,
    /// Constraint that failed
    pub constraint: ConstraintType,
}

impl Violation {
    /// Create new violation
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, constraint: impl Into<ConstraintType>) -> Self {
        Self {
            path: path.into(),
            constraint: constraint.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_json() {
        let json = r#"{"path":"branch.establishedYear","constraint":"NotNull"}"#;
        let violation: Violation = serde_json::from_str(json).unwrap();
        assert_eq!(violation, Violation::new("branch.establishedYear", "NotNull"));
    }
}
