//! Structural paths within an object graph
//!
//! Provides [`Path`] for addressing beans, properties and container elements
//! from the root of a correction pass.

use crate::value::MapKey;
use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter};

/// Kind of element a path node addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A bean instance
    Bean,

    /// A property of a bean
    Property,

    /// An element within a container (list, array, map)
    ContainerElement,
}

/// Position or key of a container element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathIndex {
    /// Index into a list or array
    Position(usize),

    /// Key into a map
    Key(MapKey),
}

impl Display for PathIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(i) => write!(f, "{i}"),
            Self::Key(k) => write!(f, "{k}"),
        }
    }
}

/// Single node of a [`Path`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathNode {
    kind: ElementKind,
    name: Option<String>,
    index: Option<PathIndex>,
}

impl PathNode {
    /// Bean node; contributes nothing to the rendered path
    #[inline]
    #[must_use]
    pub fn bean() -> Self {
        Self {
            kind: ElementKind::Bean,
            name: None,
            index: None,
        }
    }

    /// Named property node
    #[inline]
    #[must_use]
    pub fn property(name: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Property,
            name: Some(name.into()),
            index: None,
        }
    }

    /// Container element node of the named property
    #[inline]
    #[must_use]
    pub fn container_element(name: impl Into<String>, index: PathIndex) -> Self {
        Self {
            kind: ElementKind::ContainerElement,
            name: Some(name.into()),
            index: Some(index),
        }
    }

    /// Node kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Property name, if any
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Container index or key, if any
    #[inline]
    #[must_use]
    pub fn index(&self) -> Option<&PathIndex> {
        self.index.as_ref()
    }
}

/// Route from the root of a correction pass to a node
///
/// Rendering joins property names with `.` and container indices with
/// `[...]`; bean nodes render as nothing.
///
/// # Examples
/// - property `a`, element `0`, property `b` → `a[0].b`
/// - property `contacts`, key `home` → `contacts[home]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathNode>);

impl Path {
    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create path from nodes
    #[inline]
    #[must_use]
    pub fn new(nodes: Vec<PathNode>) -> Self {
        Self(nodes)
    }

    /// Append a node in place
    #[inline]
    pub fn push(&mut self, node: PathNode) {
        self.0.push(node);
    }

    /// Remove the last node
    #[inline]
    pub fn pop(&mut self) -> Option<PathNode> {
        self.0.pop()
    }

    /// Append a node, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, node: PathNode) -> Self {
        let mut new = self.clone();
        new.0.push(node);
        new
    }

    /// Path nodes from root to leaf
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[PathNode] {
        &self.0
    }

    /// Last node (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&PathNode> {
        self.0.last()
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterator over nodes from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &PathNode> {
        self.0.iter()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut empty = true;
        for node in &self.0 {
            match (node.kind, &node.name, &node.index) {
                (ElementKind::Property, Some(name), _) => {
                    if !empty {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                    empty = false;
                }
                (ElementKind::ContainerElement, _, Some(index)) => {
                    write!(f, "[{index}]")?;
                    empty = false;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<Vec<PathNode>> for Path {
    fn from(nodes: Vec<PathNode>) -> Self {
        Self(nodes)
    }
}
