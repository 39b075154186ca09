//! Amend Core - schema-driven object-graph correction
//!
//! The engine that:
//! - Inspects declared bean types into cached metadata
//! - Resolves requested groups into ordered correction passes
//! - Walks object graphs depth-first, cycle-safe
//! - Dispatches each correction to an applier by value type
//! - Writes corrected values back and records every change
//!
//! # Example
//!
//! ```rust
//! use amend_api::{Bean, CorrectionDescriptor, PropertyDecl, Schema, TypeDescriptor, TypeSchema, Value};
//! use amend_core::Corrector;
//!
//! let schema = Schema::builder()
//!     .ty(TypeSchema::new("PhoneNumber")
//!         .property(PropertyDecl::new("number", TypeDescriptor::String)
//!             .on_field(CorrectionDescriptor::trim())))
//!     .build();
//! let corrector = Corrector::new(schema);
//!
//! let phone = Bean::new("PhoneNumber").with("number", " 555 ").build();
//! let applied = corrector.correct(&phone, &[]).unwrap();
//!
//! assert_eq!(applied.len(), 1);
//! assert_eq!(applied[0].path().to_string(), "number");
//! assert_eq!(phone.as_bean().unwrap().get("number"), Value::from("555"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod correction;
pub mod corrector;
pub mod error;
pub mod group;
pub mod metadata;
pub mod modification;
pub mod traversal;
pub mod util;

pub use config::CorrectorConfig;
pub use correction::CorrectionApplierRegistry;
pub use corrector::{Corrector, CorrectorBuilder};
pub use error::{
    AccessError, ConfigurationSource, CorrectorError, GroupSequenceError, InspectionError,
    ModificationError, Result, TraversalError,
};
pub use group::{GroupSequenceGenerator, GroupSequenceIterator};
pub use metadata::{MetadataCache, PropertyMetadata, SchemaInspector, TraversalModifier, TypeMetadata};
pub use modification::{BeanModifier, CorrectionMode, ModificationContext, ValueCorrector};
pub use traversal::{BeanNode, BeanTraverser, ContainerElementNode, ParentNode, PropertyNode, TraversalCallback};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for correcting object graphs
    pub use crate::{Corrector, CorrectorConfig, CorrectorError};
    pub use amend_api::{
        AppliedCorrection, Bean, CorrectionDescriptor, GroupId, PropertyDecl, Schema, TypeDescriptor,
        TypeSchema, Value, Violation,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
