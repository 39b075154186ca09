//! Graph traversal

mod callback;
mod node;
mod traverser;

pub use callback::TraversalCallback;
pub use node::{BeanNode, ContainerElementNode, ParentNode, PropertyNode};
pub use traverser::BeanTraverser;
