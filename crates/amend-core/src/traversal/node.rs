//! Nodes handed to traversal callbacks

use crate::metadata::{PropertyMetadata, TypeMetadata};
use crate::util::types::ContainerKind;
use amend_api::{BeanRef, Path, PathIndex, Value};
use std::sync::Arc;

/// Slot through which a nested bean was reached
///
/// Used to write a replacement bean back into its owner.
#[derive(Debug, Clone)]
pub enum ParentNode {
    /// Value of a bean property
    Property {
        owner: BeanRef,
        property: Arc<PropertyMetadata>,
    },

    /// Element of a container held by a bean property
    ContainerElement {
        owner: BeanRef,
        property: Arc<PropertyMetadata>,
        kind: ContainerKind,
        index: PathIndex,
    },
}

/// A bean being visited
#[derive(Debug, Clone, Copy)]
pub struct BeanNode<'a> {
    pub bean: &'a BeanRef,
    pub metadata: &'a TypeMetadata,
    pub path: &'a Path,
    /// `None` for the root
    pub parent: Option<&'a ParentNode>,
}

/// A property of a bean being visited
#[derive(Debug, Clone, Copy)]
pub struct PropertyNode<'a> {
    pub owner: &'a BeanRef,
    pub property: &'a Arc<PropertyMetadata>,
    /// Value read when the property was entered
    pub value: &'a Value,
    pub path: &'a Path,
}

/// An element of a container property being visited
#[derive(Debug, Clone, Copy)]
pub struct ContainerElementNode<'a> {
    pub owner: &'a BeanRef,
    pub property: &'a Arc<PropertyMetadata>,
    pub kind: ContainerKind,
    pub index: &'a PathIndex,
    /// Element read when the container was entered
    pub value: &'a Value,
    pub path: &'a Path,
}
