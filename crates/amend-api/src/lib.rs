//! Amend API
//!
//! Declarative surface of the amend correction engine.
//!
//! # Core Concepts
//!
//! - [`Value`] / [`BeanRef`]: dynamic object graph under correction
//! - [`TypeDescriptor`]: declared and runtime types used for dispatch
//! - [`Schema`]: statically declared bean types, enums and groups
//! - [`CorrectionDescriptor`]: a correction attached to a node
//! - [`CorrectionApplier`]: executable correction logic
//! - [`Path`]: structural address from the root to a node
//! - [`AppliedCorrection`]: record of one change
//!
//! # Example
//!
//! ```rust
//! use amend_api::{Bean, CorrectionDescriptor, PropertyDecl, Schema, TypeDescriptor, TypeSchema};
//!
//! let schema = Schema::builder()
//!     .ty(TypeSchema::new("PhoneNumber")
//!         .property(PropertyDecl::new("number", TypeDescriptor::String)
//!             .on_field(CorrectionDescriptor::trim())))
//!     .build();
//!
//! let phone = Bean::new("PhoneNumber").with("number", " 555 ").build();
//! assert!(schema.type_schema(&"PhoneNumber".into()).is_some());
//! assert!(phone.as_bean().is_some());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod applied;
mod applier;
mod correction;
mod group;
mod path;
mod schema;
mod types;
mod value;
mod violation;

pub use applied::AppliedCorrection;
pub use applier::{
    ApplierContext, ApplierDeclaration, ApplierFactory, ApplierOutcome, CorrectionApplier,
    CorrectionError,
};
pub use correction::{
    AnnotationType, CorrectionDefinition, CorrectionDescriptor, CorrectionSpec, CorrectionTarget,
    DefaultValue, PayloadId,
};
pub use group::{GroupDefinition, GroupId, GroupKind};
pub use path::{ElementKind, Path, PathIndex, PathNode};
pub use schema::{Annotation, EnumSchema, PropertyDecl, Schema, SchemaBuilder, TypeSchema};
pub use types::{PrimitiveKind, TypeDescriptor, TypeName};
pub use value::{Bean, BeanData, BeanId, BeanRef, EnumValue, MapKey, Value};
pub use violation::{ConstraintType, Violation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
