//! Type descriptors
//!
//! Provides [`TypeDescriptor`], the static description of a property's
//! declared type and of a value's runtime type. Dispatch of correction
//! appliers and container classification both work on these descriptors.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Name of a declared type (bean, enum or generic raw type)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeName(String);

impl TypeName {
    /// Create new type name
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

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Primitive scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// All primitive kinds, in declaration order
    pub const ALL: [PrimitiveKind; 8] = [
        Self::Bool,
        Self::Char,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
    ];

    /// Lowercase name of the kind
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// Declared or runtime type of a value
///
/// `Primitive` is the bare scalar; `Boxed` is the nullable slot holding the
/// same scalar. The two are compatible for applier dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    /// Bare scalar
    Primitive(PrimitiveKind),

    /// Nullable scalar slot
    Boxed(PrimitiveKind),

    /// UTF-8 string
    String,

    /// Declared enumeration
    Enum(TypeName),

    /// Bean type, optionally with generic arguments
    Bean { name: TypeName, args: Vec<TypeDescriptor> },

    /// Growable ordered container
    List(Box<TypeDescriptor>),

    /// Fixed-length ordered container
    Array(Box<TypeDescriptor>),

    /// Keyed container
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
}

impl TypeDescriptor {
    /// Non-generic bean type
    #[inline]
    #[must_use]
    pub fn bean(name: impl Into<TypeName>) -> Self {
        Self::Bean {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Generic bean type with arguments
    #[inline]
    #[must_use]
    pub fn generic(name: impl Into<TypeName>, args: Vec<TypeDescriptor>) -> Self {
        Self::Bean {
            name: name.into(),
            args,
        }
    }

    /// Enum type
    #[inline]
    #[must_use]
    pub fn enumeration(name: impl Into<TypeName>) -> Self {
        Self::Enum(name.into())
    }

    /// List of elements
    #[inline]
    #[must_use]
    pub fn list(element: TypeDescriptor) -> Self {
        Self::List(Box::new(element))
    }

    /// Array of elements
    #[inline]
    #[must_use]
    pub fn array(element: TypeDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    /// Map from keys to values
    #[inline]
    #[must_use]
    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Generic arguments, in declaration order
    ///
    /// Containers report their element types (key then value for maps).
    #[must_use]
    pub fn type_args(&self) -> Vec<&TypeDescriptor> {
        match self {
            Self::Bean { args, .. } => args.iter().collect(),
            Self::List(element) | Self::Array(element) => vec![element.as_ref()],
            Self::Map(key, value) => vec![key.as_ref(), value.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Check if this describes an enumeration
    #[inline]
    #[must_use]
    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.write_str(kind.name()),
            Self::Boxed(kind) => write!(f, "Option<{}>", kind.name()),
            Self::String => f.write_str("String"),
            Self::Enum(name) => write!(f, "{name}"),
            Self::Bean { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
                    write!(f, "<{}>", rendered.join(", "))?;
                }
                Ok(())
            }
            Self::List(element) => write!(f, "List<{element}>"),
            Self::Array(element) => write!(f, "[{element}]"),
            Self::Map(key, value) => write!(f, "Map<{key}, {value}>"),
        }
    }
}
