//! Type metadata: inspection and caching

mod cache;
mod inspector;
mod model;

pub use cache::MetadataCache;
pub use inspector::SchemaInspector;
pub use model::{PropertyMetadata, TraversalModifier, TypeMetadata};
