//! Correction groups
//!
//! A group is a named marker scoping which corrections run in a pass.
//! Groups may extend other groups, or declare an ordered sequence of member
//! groups that run as consecutive passes.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Identifier of a group marker
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    /// Name of the implicit default group
    pub const DEFAULT_NAME: &'static str = "Default";

    /// Create new group id
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The implicit default group
    #[inline]
    #[must_use]
    pub fn default_group() -> Self {
        Self(Self::DEFAULT_NAME.to_string())
    }

    /// Check if this is the implicit default group
    #[inline]
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT_NAME
    }

    /// Name as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Shape of a group marker type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupKind {
    /// Interface-like marker; the only kind usable as a group
    #[default]
    Marker,

    /// Concrete type; rejected when used as a group
    Concrete,
}

/// Declaration of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDefinition {
    id: GroupId,
    kind: GroupKind,
    extends: Vec<GroupId>,
    sequence: Option<Vec<GroupId>>,
}

impl GroupDefinition {
    /// Plain marker group
    #[inline]
    #[must_use]
    pub fn marker(id: impl Into<GroupId>) -> Self {
        Self {
            id: id.into(),
            kind: GroupKind::Marker,
            extends: Vec::new(),
            sequence: None,
        }
    }

    /// Concrete (non-marker) type registered under a group name
    #[inline]
    #[must_use]
    pub fn concrete(id: impl Into<GroupId>) -> Self {
        Self {
            kind: GroupKind::Concrete,
            ..Self::marker(id)
        }
    }

    /// Marker group declaring an ordered sequence of member groups
    #[inline]
    #[must_use]
    pub fn sequence(id: impl Into<GroupId>, members: Vec<GroupId>) -> Self {
        Self {
            sequence: Some(members),
            ..Self::marker(id)
        }
    }

    /// Add supertype markers
    #[inline]
    #[must_use]
    pub fn extends(mut self, parents: Vec<GroupId>) -> Self {
        self.extends = parents;
        self
    }

    /// Group id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &GroupId {
        &self.id
    }

    /// Group kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Supertype markers, in declaration order
    #[inline]
    #[must_use]
    pub fn parents(&self) -> &[GroupId] {
        &self.extends
    }

    /// Declared sequence, if any
    #[inline]
    #[must_use]
    pub fn members(&self) -> Option<&[GroupId]> {
        self.sequence.as_deref()
    }

    /// Check if this group declares a sequence
    #[inline]
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.sequence.is_some()
    }
}

impl From<String> for GroupId {
    fn from(name: String) -> Self {
        Self(name)
    }
}
