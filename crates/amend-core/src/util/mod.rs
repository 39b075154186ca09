//! Type, container and property utilities

pub mod bean;
pub mod container;
pub mod types;

pub use types::{boxed_counterpart, container_kind, element_type, types_match, ContainerKind};
