//! Dynamic value model
//!
//! Provides [`Value`], the runtime representation of an object graph under
//! correction, and [`BeanRef`], a shared handle to a bean whose properties
//! are mutated in place.
//!
//! Beans are shared by identity: two `BeanRef`s are the same bean when they
//! point at the same allocation. Graphs may contain cycles.

use crate::types::{PrimitiveKind, TypeDescriptor, TypeName};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

/// Enum literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnumValue {
    /// Declaring enum type
    pub enum_type: TypeName,
    /// Variant name
    pub variant: String,
}

impl EnumValue {
    /// Create new enum literal
    #[inline]
    #[must_use]
    pub fn new(enum_type: impl Into<TypeName>, variant: impl Into<String>) -> Self {
        Self {
            enum_type: enum_type.into(),
            variant: variant.into(),
        }
    }
}

impl Display for EnumValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.variant)
    }
}

/// Key of a map container
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MapKey {
    Bool(bool),
    Char(char),
    Int(i64),
    String(String),
    Enum(EnumValue),
}

impl Display for MapKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
            Self::Enum(e) => write!(f, "{e}"),
        }
    }
}

impl From<&str> for MapKey {
    fn from(key: &str) -> Self {
        Self::String(key.to_string())
    }
}

impl From<String> for MapKey {
    fn from(key: String) -> Self {
        Self::String(key)
    }
}

impl From<i64> for MapKey {
    fn from(key: i64) -> Self {
        Self::Int(key)
    }
}

/// Identity of a bean allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeanId(usize);

/// Runtime state of a bean
#[derive(Debug, Clone, PartialEq)]
pub struct BeanData {
    type_name: TypeName,
    type_args: Vec<TypeDescriptor>,
    properties: IndexMap<String, Value>,
}

impl BeanData {
    /// Create empty bean state of the given type
    #[inline]
    #[must_use]
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            type_args: Vec::new(),
            properties: IndexMap::new(),
        }
    }

    /// Runtime type name
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Generic type arguments of this instance
    #[inline]
    #[must_use]
    pub fn type_args(&self) -> &[TypeDescriptor] {
        &self.type_args
    }

    /// Property value; absent properties read as `Null`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        self.properties.get(name).cloned().unwrap_or(Value::Null)
    }

    /// Borrowed property value, if stored
    #[inline]
    #[must_use]
    pub fn get_ref(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Mutable slot for a property, created as `Null` if absent
    #[inline]
    pub fn slot_mut(&mut self, name: &str) -> &mut Value {
        self.properties.entry(name.to_string()).or_insert(Value::Null)
    }

    /// Replace a property value, returning the previous one
    #[inline]
    pub fn set(&mut self, name: &str, value: Value) -> Value {
        std::mem::replace(self.slot_mut(name), value)
    }

    /// Iterate over stored properties in insertion order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Shared, mutable handle to a bean
///
/// Cloning the handle does not clone the bean. Locks are never held across
/// calls into user code by the engine.
#[derive(Clone)]
pub struct BeanRef(Arc<RwLock<BeanData>>);

impl BeanRef {
    /// Wrap bean state in a new handle
    #[inline]
    #[must_use]
    pub fn new(data: BeanData) -> Self {
        Self(Arc::new(RwLock::new(data)))
    }

    /// Identity of the underlying allocation
    #[inline]
    #[must_use]
    pub fn id(&self) -> BeanId {
        BeanId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    /// Check if both handles point to the same bean
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Runtime type name
    #[must_use]
    pub fn type_name(&self) -> TypeName {
        self.0.read().type_name.clone()
    }

    /// Runtime type, including generic arguments
    #[must_use]
    pub fn runtime_type(&self) -> TypeDescriptor {
        let data = self.0.read();
        TypeDescriptor::Bean {
            name: data.type_name.clone(),
            args: data.type_args.clone(),
        }
    }

    /// Read a property value
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        self.0.read().get(name)
    }

    /// Write a property value, returning the previous one
    pub fn set(&self, name: &str, value: Value) -> Value {
        self.0.write().set(name, value)
    }

    /// Run `f` with shared access to the bean state
    pub fn with<R>(&self, f: impl FnOnce(&BeanData) -> R) -> R {
        f(&self.0.read())
    }

    /// Run `f` with exclusive access to the bean state
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut BeanData) -> R) -> R {
        f(&mut self.0.write())
    }

    /// Snapshot of the bean state
    #[must_use]
    pub fn snapshot(&self) -> BeanData {
        self.0.read().clone()
    }

    /// Overwrite this bean's state with `data`, keeping its identity
    pub fn replace_state(&self, data: BeanData) {
        *self.0.write() = data;
    }
}

impl Debug for BeanRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // Never recurse into properties: graphs may be cyclic.
        match self.0.try_read() {
            Some(data) => write!(f, "BeanRef({}@{:#x})", data.type_name, self.id().0),
            None => write!(f, "BeanRef(<locked>@{:#x})", self.id().0),
        }
    }
}

impl PartialEq for BeanRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Builder for bean instances
///
/// # Example
/// ```rust
/// use amend_api::{Bean, Value};
///
/// let phone = Bean::new("PhoneNumber").with("number", " 555 ").build();
/// assert_eq!(phone.as_bean().unwrap().get("number"), Value::from(" 555 "));
/// ```
#[derive(Debug)]
pub struct Bean {
    data: BeanData,
}

impl Bean {
    /// Start building a bean of the given type
    #[inline]
    #[must_use]
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            data: BeanData::new(type_name),
        }
    }

    /// Set generic type arguments
    #[inline]
    #[must_use]
    pub fn type_args(mut self, args: Vec<TypeDescriptor>) -> Self {
        self.data.type_args = args;
        self
    }

    /// Set a property
    #[inline]
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.data.set(name, value.into());
        self
    }

    /// Finish as a shared handle
    #[inline]
    #[must_use]
    pub fn build_ref(self) -> BeanRef {
        BeanRef::new(self.data)
    }

    /// Finish as a value
    #[inline]
    #[must_use]
    pub fn build(self) -> Value {
        Value::Bean(self.build_ref())
    }
}

/// Runtime value in an object graph
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
    Enum(EnumValue),
    List(Vec<Value>),
    Array(Vec<Value>),
    Map(IndexMap<MapKey, Value>),
    Bean(BeanRef),
}

impl Value {
    /// Check for `Null`
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Bean handle, if this is a bean
    #[inline]
    #[must_use]
    pub fn as_bean(&self) -> Option<&BeanRef> {
        match self {
            Self::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    /// String slice, if this is a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Self-describing runtime type
    ///
    /// Containers and `Null` carry no element type information and return
    /// `None`; callers fall back to the declared type.
    #[must_use]
    pub fn runtime_type(&self) -> Option<TypeDescriptor> {
        let primitive = |kind| Some(TypeDescriptor::Primitive(kind));
        match self {
            Self::Null | Self::List(_) | Self::Array(_) | Self::Map(_) => None,
            Self::Bool(_) => primitive(PrimitiveKind::Bool),
            Self::Char(_) => primitive(PrimitiveKind::Char),
            Self::I8(_) => primitive(PrimitiveKind::I8),
            Self::I16(_) => primitive(PrimitiveKind::I16),
            Self::I32(_) => primitive(PrimitiveKind::I32),
            Self::I64(_) => primitive(PrimitiveKind::I64),
            Self::F32(_) => primitive(PrimitiveKind::F32),
            Self::F64(_) => primitive(PrimitiveKind::F64),
            Self::String(_) => Some(TypeDescriptor::String),
            Self::Enum(e) => Some(TypeDescriptor::Enum(e.enum_type.clone())),
            Self::Bean(bean) => Some(bean.runtime_type()),
        }
    }

    /// Short name of the value's shape, for diagnostics
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Bean(_) => "bean",
        }
    }

    /// Identity comparison used to decide whether a write took effect
    ///
    /// Beans compare by identity, floats by bit pattern, containers
    /// element-wise, everything else by value.
    #[must_use]
    pub fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::List(a), Self::List(b)) | (Self::Array(a), Self::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_identical(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.is_identical(vb))
            }
            (Self::Bean(a), Self::Bean(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            _ => self.is_identical(other),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Enum(v) => write!(f, "{v}"),
            Self::List(items) | Self::Array(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Self::Map(entries) => {
                let rendered: Vec<String> =
                    entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Self::Bean(bean) => write!(f, "{}", bean.type_name()),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => String,
    EnumValue => Enum,
    BeanRef => Bean,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<IndexMap<MapKey, Value>> for Value {
    fn from(v: IndexMap<MapKey, Value>) -> Self {
        Self::Map(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_property_reads_null() {
        let bean = Bean::new("Person").build_ref();
        assert!(bean.get("name").is_null());
    }

    #[test]
    fn set_returns_previous() {
        let bean = Bean::new("Person").with("name", "Michael").build_ref();
        let previous = bean.set("name", Value::from("Dwight"));
        assert_eq!(previous, Value::from("Michael"));
        assert_eq!(bean.get("name"), Value::from("Dwight"));
    }

    #[test]
    fn clones_share_identity() {
        let a = Bean::new("Person").build_ref();
        let b = a.clone();
        let c = Bean::new("Person").build_ref();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.id(), b.id());
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn beans_are_identical_only_by_identity() {
        let a = Bean::new("Money").with("amount", 1.0).build();
        let b = Bean::new("Money").with("amount", 1.0).build();
        assert!(a.is_identical(&a.clone()));
        assert!(!a.is_identical(&b));
    }

    #[test]
    fn nan_is_identical_to_itself() {
        let nan = Value::F64(f64::NAN);
        assert!(nan.is_identical(&nan.clone()));
        assert_ne!(nan, nan.clone());
    }

    #[test]
    fn runtime_types() {
        assert_eq!(
            Value::I32(1).runtime_type(),
            Some(TypeDescriptor::Primitive(PrimitiveKind::I32))
        );
        assert_eq!(Value::List(vec![]).runtime_type(), None);
        let generic = Bean::new("Tag")
            .type_args(vec![TypeDescriptor::String])
            .build();
        assert_eq!(
            generic.runtime_type(),
            Some(TypeDescriptor::generic("Tag", vec![TypeDescriptor::String]))
        );
    }

    #[test]
    fn cyclic_debug_terminates() {
        let a = Bean::new("Node").build_ref();
        a.set("next", Value::Bean(a.clone()));
        let rendered = format!("{:?}", Value::Bean(a));
        assert!(rendered.contains("Node"));
    }

    #[test]
    fn replace_state_keeps_identity() {
        let a = Bean::new("Money").build_ref();
        let before = a.id();
        a.replace_state(Bean::new("Money").with("currencyCode", "GBP").build_ref().snapshot());
        assert_eq!(a.id(), before);
        assert_eq!(a.get("currencyCode"), Value::from("GBP"));
    }
}
