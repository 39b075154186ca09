//! Type classification and compatibility

use amend_api::TypeDescriptor;
use std::fmt::{self, Display, Formatter};

/// Shape of a container type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Array,
    Map,
}

impl Display for ContainerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Array => "array",
            Self::Map => "map",
        })
    }
}

/// Container kind of a declared type, if it is one
#[must_use]
pub fn container_kind(ty: &TypeDescriptor) -> Option<ContainerKind> {
    match ty {
        TypeDescriptor::List(_) => Some(ContainerKind::List),
        TypeDescriptor::Array(_) => Some(ContainerKind::Array),
        TypeDescriptor::Map(_, _) => Some(ContainerKind::Map),
        _ => None,
    }
}

/// Declared type of a container's elements (the value type for maps)
#[must_use]
pub fn element_type(ty: &TypeDescriptor) -> Option<&TypeDescriptor> {
    match ty {
        TypeDescriptor::List(element) | TypeDescriptor::Array(element) => Some(element),
        TypeDescriptor::Map(_, value) => Some(value),
        _ => None,
    }
}

/// Boxed form of a primitive, or primitive form of a boxed scalar
#[must_use]
pub fn boxed_counterpart(ty: &TypeDescriptor) -> Option<TypeDescriptor> {
    match ty {
        TypeDescriptor::Primitive(kind) => Some(TypeDescriptor::Boxed(*kind)),
        TypeDescriptor::Boxed(kind) => Some(TypeDescriptor::Primitive(*kind)),
        _ => None,
    }
}

/// Structural compatibility of two types
///
/// Types match when they are equal, boxing-compatible, or the same
/// container family or bean with pairwise matching type arguments. A generic
/// bean never matches its raw form.
#[must_use]
pub fn types_match(a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
    use TypeDescriptor as T;

    if a == b {
        return true;
    }
    match (a, b) {
        (T::Primitive(x), T::Boxed(y)) | (T::Boxed(x), T::Primitive(y)) => x == y,
        (T::List(x), T::List(y)) | (T::Array(x), T::Array(y)) => types_match(x, y),
        (T::Map(ka, va), T::Map(kb, vb)) => types_match(ka, kb) && types_match(va, vb),
        (T::Bean { name: na, args: aa }, T::Bean { name: nb, args: ab }) => {
            na == nb
                && aa.len() == ab.len()
                && aa.iter().zip(ab).all(|(x, y)| types_match(x, y))
        }
        _ => false,
    }
}
