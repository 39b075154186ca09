//! Depth-first walk over an object graph
//!
//! Beans are visited once per walk, keyed by identity. A bean reachable
//! from itself is skipped while it is still on the stack, so cyclic graphs
//! terminate. The path is pushed before entering a child and popped after
//! it returns, success or failure.

use crate::error::{CorrectorError, TraversalError};
use crate::metadata::{MetadataCache, PropertyMetadata, TypeMetadata};
use crate::traversal::callback::TraversalCallback;
use crate::traversal::node::{BeanNode, ContainerElementNode, ParentNode, PropertyNode};
use crate::util::bean::get_property_value;
use crate::util::container::container_entries;
use crate::util::types::{container_kind, ContainerKind};
use amend_api::{BeanId, BeanRef, Path, PathIndex, PathNode, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Per-walk state
#[derive(Default)]
struct WalkState {
    visited: HashSet<BeanId>,
    in_progress: HashSet<BeanId>,
    path: Path,
    depth: usize,
}

/// Walks beans, properties and container elements, invoking a callback
/// around each
///
/// Holds no per-walk state; one instance serves concurrent walks.
#[derive(Debug, Clone)]
pub struct BeanTraverser {
    metadata: Arc<MetadataCache>,
    max_depth: usize,
}

impl BeanTraverser {
    /// Create traverser reading metadata from `metadata`
    #[must_use]
    pub fn new(metadata: Arc<MetadataCache>, max_depth: usize) -> Self {
        Self { metadata, max_depth }
    }

    /// Walk the graph rooted at `root`
    ///
    /// A root that is not a bean is a no-op.
    ///
    /// # Errors
    /// Returns [`TraversalError`] naming the root type if metadata
    /// inspection, a property read, the depth limit, or any callback fails.
    pub fn traverse<C, F>(&self, root: &Value, callback: &F, context: &mut C) -> Result<(), TraversalError>
    where
        F: TraversalCallback<C> + ?Sized,
    {
        let mut state = WalkState::default();
        self.visit_bean(root, None, callback, context, &mut state)
            .map_err(|err| {
                let root_type = root
                    .as_bean()
                    .map_or_else(|| root.kind_name().to_string(), |b| b.type_name().to_string());
                TraversalError::new(&root_type, err)
            })
    }

    fn visit_bean<C, F>(
        &self,
        value: &Value,
        parent: Option<&ParentNode>,
        callback: &F,
        context: &mut C,
        state: &mut WalkState,
    ) -> Result<(), CorrectorError>
    where
        F: TraversalCallback<C> + ?Sized,
    {
        let Value::Bean(bean) = value else {
            return Ok(());
        };
        let id = bean.id();
        if state.visited.contains(&id) || state.in_progress.contains(&id) {
            return Ok(());
        }
        let Some(metadata) = self.metadata.inspect(value)? else {
            return Ok(());
        };
        if state.depth >= self.max_depth {
            return Err(CorrectorError::DepthExceeded(self.max_depth));
        }

        state.depth += 1;
        state.in_progress.insert(id);
        state.path.push(PathNode::bean());
        let result = self.walk_bean(bean, &metadata, parent, callback, context, state);
        state.path.pop();
        state.in_progress.remove(&id);
        state.depth -= 1;

        result?;
        state.visited.insert(id);
        Ok(())
    }

    fn walk_bean<C, F>(
        &self,
        bean: &BeanRef,
        metadata: &TypeMetadata,
        parent: Option<&ParentNode>,
        callback: &F,
        context: &mut C,
        state: &mut WalkState,
    ) -> Result<(), CorrectorError>
    where
        F: TraversalCallback<C> + ?Sized,
    {
        tracing::trace!(path = %state.path, type_name = %metadata.type_name(), "entering bean");
        callback.bean_entered(
            &BeanNode {
                bean,
                metadata,
                path: &state.path,
                parent,
            },
            context,
        )?;
        for property in metadata.properties() {
            state.path.push(PathNode::property(property.name()));
            let result = self.visit_property(bean, property, callback, context, state);
            state.path.pop();
            result?;
        }
        callback.bean_exited(
            &BeanNode {
                bean,
                metadata,
                path: &state.path,
                parent,
            },
            context,
        )
    }

    fn visit_property<C, F>(
        &self,
        owner: &BeanRef,
        property: &Arc<PropertyMetadata>,
        callback: &F,
        context: &mut C,
        state: &mut WalkState,
    ) -> Result<(), CorrectorError>
    where
        F: TraversalCallback<C> + ?Sized,
    {
        let value = get_property_value(owner, property)?;
        callback.property_entered(
            &PropertyNode {
                owner,
                property,
                value: &value,
                path: &state.path,
            },
            context,
        )?;

        if !value.is_null() {
            if let Some(kind) = container_kind(property.declared_type()) {
                for (index, element) in container_entries(kind, &value)? {
                    state
                        .path
                        .push(PathNode::container_element(property.name(), index.clone()));
                    let result =
                        self.visit_element(owner, property, kind, &index, &element, callback, context, state);
                    state.path.pop();
                    result?;
                }
            } else if property.is_nested() {
                let parent = ParentNode::Property {
                    owner: owner.clone(),
                    property: Arc::clone(property),
                };
                self.visit_bean(&value, Some(&parent), callback, context, state)?;
            }
        }

        callback.property_exited(
            &PropertyNode {
                owner,
                property,
                value: &value,
                path: &state.path,
            },
            context,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn visit_element<C, F>(
        &self,
        owner: &BeanRef,
        property: &Arc<PropertyMetadata>,
        kind: ContainerKind,
        index: &PathIndex,
        element: &Value,
        callback: &F,
        context: &mut C,
        state: &mut WalkState,
    ) -> Result<(), CorrectorError>
    where
        F: TraversalCallback<C> + ?Sized,
    {
        callback.container_element_entered(
            &ContainerElementNode {
                owner,
                property,
                kind,
                index,
                value: element,
                path: &state.path,
            },
            context,
        )?;
        if property.is_nested() && !element.is_null() {
            let parent = ParentNode::ContainerElement {
                owner: owner.clone(),
                property: Arc::clone(property),
                kind,
                index: index.clone(),
            };
            self.visit_bean(element, Some(&parent), callback, context, state)?;
        }
        callback.container_element_exited(
            &ContainerElementNode {
                owner,
                property,
                kind,
                index,
                value: element,
                path: &state.path,
            },
            context,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::SchemaInspector;
    use amend_api::{Bean, CorrectionError, PropertyDecl, Schema, TypeDescriptor, TypeSchema};
    use pretty_assertions::assert_eq;

    fn traverser(max_depth: usize) -> BeanTraverser {
        let schema = Schema::builder()
            .ty(TypeSchema::new("Office")
                .property(PropertyDecl::new("name", TypeDescriptor::String))
                .property(PropertyDecl::new("tags", TypeDescriptor::list(TypeDescriptor::String)))
                .property(PropertyDecl::new("manager", TypeDescriptor::bean("Person")).nested())
                .property(PropertyDecl::new("owner", TypeDescriptor::bean("Person"))))
            .ty(TypeSchema::new("Person").property(PropertyDecl::new("name", TypeDescriptor::String)))
            .ty(TypeSchema::new("Node")
                .property(PropertyDecl::new("next", TypeDescriptor::bean("Node")).nested())
                .property(
                    PropertyDecl::new("peers", TypeDescriptor::list(TypeDescriptor::bean("Node"))).nested(),
                ))
            .build();
        let cache = MetadataCache::new(SchemaInspector::new(Arc::new(schema)));
        BeanTraverser::new(Arc::new(cache), max_depth)
    }

    /// Records `event:path` for every hook
    struct Recorder;

    impl TraversalCallback<Vec<String>> for Recorder {
        fn bean_entered(&self, node: &BeanNode<'_>, log: &mut Vec<String>) -> Result<(), CorrectorError> {
            log.push(format!("bean+:{}:{}", node.metadata.type_name(), node.path));
            Ok(())
        }

        fn bean_exited(&self, node: &BeanNode<'_>, log: &mut Vec<String>) -> Result<(), CorrectorError> {
            log.push(format!("bean-:{}", node.path));
            Ok(())
        }

        fn property_entered(&self, node: &PropertyNode<'_>, log: &mut Vec<String>) -> Result<(), CorrectorError> {
            log.push(format!("prop+:{}", node.path));
            Ok(())
        }

        fn container_element_entered(
            &self,
            node: &ContainerElementNode<'_>,
            log: &mut Vec<String>,
        ) -> Result<(), CorrectorError> {
            log.push(format!("elem+:{}", node.path));
            Ok(())
        }
    }

    struct FailOn(&'static str);

    impl TraversalCallback<()> for FailOn {
        fn property_entered(&self, node: &PropertyNode<'_>, _: &mut ()) -> Result<(), CorrectorError> {
            if node.property.name() == self.0 {
                return Err(CorrectorError::correction("Test".into(), CorrectionError::failed("boom")));
            }
            Ok(())
        }
    }

    #[test]
    fn visits_in_order_with_paths() {
        let office = Bean::new("Office")
            .with("name", "Scranton")
            .with("tags", Value::List(vec![Value::from("paper"), Value::from("sales")]))
            .with("manager", Bean::new("Person").with("name", "Michael").build())
            .with("owner", Bean::new("Person").with("name", "David").build())
            .build();
        let mut log = Vec::new();
        traverser(16).traverse(&office, &Recorder, &mut log).unwrap();

        assert_eq!(
            log,
            vec![
                "bean+:Office:",
                "prop+:name",
                "prop+:tags",
                "elem+:tags[0]",
                "elem+:tags[1]",
                "prop+:manager",
                "bean+:Person:manager",
                "prop+:manager.name",
                "bean-:manager",
                "prop+:owner",
                "bean-:",
            ]
        );
    }

    #[test]
    fn non_bean_root_is_noop() {
        let mut log = Vec::new();
        traverser(16).traverse(&Value::from("x"), &Recorder, &mut log).unwrap();
        traverser(16).traverse(&Value::Null, &Recorder, &mut log).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn cycles_terminate() {
        let node = Bean::new("Node").build_ref();
        node.set("next", Value::Bean(node.clone()));
        node.set("peers", Value::List(vec![Value::Bean(node.clone())]));

        let mut log = Vec::new();
        traverser(16).traverse(&Value::Bean(node), &Recorder, &mut log).unwrap();
        assert_eq!(log.iter().filter(|e| e.starts_with("bean+")).count(), 1);
    }

    #[test]
    fn shared_bean_visited_once() {
        let shared = Bean::new("Node").build();
        let root = Bean::new("Node")
            .with("next", shared.clone())
            .with("peers", Value::List(vec![shared]))
            .build();

        let mut log = Vec::new();
        traverser(16).traverse(&root, &Recorder, &mut log).unwrap();
        let entered: Vec<&String> = log.iter().filter(|e| e.starts_with("bean+")).collect();
        assert_eq!(entered, vec!["bean+:Node:", "bean+:Node:next"]);
        assert!(log.contains(&"elem+:peers[0]".to_string()));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let chain = Bean::new("Node")
            .with("next", Bean::new("Node").with("next", Bean::new("Node").build()).build())
            .build();

        let mut log = Vec::new();
        assert!(traverser(3).traverse(&chain, &Recorder, &mut log).is_ok());

        let err = traverser(2).traverse(&chain, &Recorder, &mut Vec::new()).unwrap_err();
        assert!(matches!(*err.source, CorrectorError::DepthExceeded(2)));
    }

    #[test]
    fn callback_errors_name_the_root() {
        let office = Bean::new("Office").with("name", "Scranton").build();
        let err = traverser(16).traverse(&office, &FailOn("tags"), &mut ()).unwrap_err();
        assert_eq!(err.message, "error during bean traversal Office");
        assert!(matches!(*err.source, CorrectorError::Correction { .. }));
    }

    #[test]
    fn unknown_types_fail() {
        let ghost = Bean::new("Ghost").build();
        let err = traverser(16).traverse(&ghost, &Recorder, &mut Vec::new()).unwrap_err();
        assert!(matches!(*err.source, CorrectorError::Inspection(_)));
    }
}
