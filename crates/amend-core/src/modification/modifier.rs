//! Orchestration of correction passes
//!
//! One traversal pass runs per resolved group. Corrections run post-order,
//! in the exit hooks, so nested values are already corrected when their
//! owner is. A failed pass stops the run; everything recorded before the
//! failure travels with the error.

use crate::error::{CorrectorError, ModificationError};
use crate::group::{GroupSequenceGenerator, GroupSequenceIterator};
use crate::modification::context::{CorrectionMode, ModificationContext};
use crate::modification::value_corrector::ValueCorrector;
use crate::traversal::{BeanNode, BeanTraverser, ContainerElementNode, ParentNode, PropertyNode, TraversalCallback};
use crate::util::bean::{get_element_value, get_property_value, set_element_value, set_property_value};
use crate::util::types::element_type;
use amend_api::{
    AppliedCorrection, ApplierContext, ApplierOutcome, BeanRef, CorrectionDescriptor, CorrectionTarget, GroupId,
    Value,
};

fn targets_property(descriptor: &CorrectionDescriptor) -> bool {
    matches!(descriptor.target(), None | Some(CorrectionTarget::Property))
}

fn targets_element(descriptor: &CorrectionDescriptor) -> bool {
    descriptor.target() == Some(CorrectionTarget::ContainerElement)
}

/// Runs correction passes over an object graph
#[derive(Debug, Clone)]
pub struct BeanModifier {
    traverser: BeanTraverser,
    groups: GroupSequenceGenerator,
    values: ValueCorrector,
}

impl BeanModifier {
    #[must_use]
    pub fn new(traverser: BeanTraverser, groups: GroupSequenceGenerator, values: ValueCorrector) -> Self {
        Self {
            traverser,
            groups,
            values,
        }
    }

    /// Correct `root` once per group resolved from `groups`
    ///
    /// `None` runs the default group; an empty slice runs no pass at all.
    ///
    /// # Errors
    /// Returns [`CorrectorError::GroupSequence`] if the groups cannot be
    /// resolved, or [`CorrectorError::Modification`] carrying the corrections
    /// applied so far if a pass fails.
    pub fn modify_bean(
        &self,
        root: &Value,
        mode: CorrectionMode<'_>,
        groups: Option<&[GroupId]>,
    ) -> Result<Vec<AppliedCorrection>, CorrectorError> {
        let passes = GroupSequenceIterator::new(self.groups.generate_sequence(groups)?);
        tracing::debug!(passes = passes.len(), "resolved group sequence");

        let mut context = ModificationContext::new(root.clone(), mode);
        for group in passes {
            tracing::debug!(group = %group, "starting correction pass");
            context.begin_pass(group);
            if let Err(err) = self.traverser.traverse(root, self, &mut context) {
                tracing::warn!(
                    group = %context.current_group(),
                    applied = context.applied().len(),
                    error = %err,
                    "correction pass aborted"
                );
                return Err(ModificationError::from_traversal(err, context.into_applied()).into());
            }
        }
        Ok(context.into_applied())
    }

    /// Write a replacement bean back through the slot it was reached by
    ///
    /// The root has no slot; its state is overwritten in place instead.
    fn write_back_bean(node: &BeanNode<'_>, new_value: &Value) -> Result<bool, CorrectorError> {
        let changed = match node.parent {
            Some(ParentNode::Property { owner, property }) => set_property_value(owner, property, new_value.clone())?,
            Some(ParentNode::ContainerElement {
                owner,
                property,
                kind,
                index,
            }) => set_element_value(owner, property, *kind, index, new_value.clone())?,
            None => match new_value {
                Value::Bean(replacement) if !replacement.ptr_eq(node.bean) => {
                    node.bean.replace_state(replacement.snapshot());
                    true
                }
                Value::Bean(_) => false,
                other => {
                    tracing::debug!(value = %other, "cannot replace root bean with a non-bean value");
                    false
                }
            },
        };
        Ok(changed)
    }
}

impl TraversalCallback<ModificationContext> for BeanModifier {
    fn bean_exited(&self, node: &BeanNode<'_>, context: &mut ModificationContext) -> Result<(), CorrectorError> {
        let mut current = Value::Bean(node.bean.clone());
        for descriptor in node.metadata.corrections().iter().filter(|d| targets_property(d)) {
            if !context.is_applicable(descriptor, node.path) {
                continue;
            }
            let Some(value_type) = current.runtime_type() else {
                continue;
            };
            let outcome = self.values.correct(
                descriptor,
                &value_type,
                &current,
                &ApplierContext::new(context.root(), current.as_bean()),
            )?;
            if let ApplierOutcome::Edited { old, new } = outcome {
                // root state is overwritten in place; keep a detached copy
                let old = if node.parent.is_none() && old.as_bean().is_some_and(|b| b.ptr_eq(node.bean)) {
                    Value::Bean(BeanRef::new(node.bean.snapshot()))
                } else {
                    old
                };
                if Self::write_back_bean(node, &new)? {
                    if node.parent.is_some() {
                        current = new.clone();
                    }
                    context.record(node.path.clone(), old, new, descriptor.clone());
                }
            }
        }
        Ok(())
    }

    fn property_exited(&self, node: &PropertyNode<'_>, context: &mut ModificationContext) -> Result<(), CorrectorError> {
        for descriptor in node.property.corrections().iter().filter(|d| targets_property(d)) {
            if !context.is_applicable(descriptor, node.path) {
                continue;
            }
            let current = get_property_value(node.owner, node.property)?;
            let outcome = self.values.correct(
                descriptor,
                node.property.declared_type(),
                &current,
                &ApplierContext::new(context.root(), Some(node.owner)),
            )?;
            if let ApplierOutcome::Edited { old, new } = outcome {
                if set_property_value(node.owner, node.property, new.clone())? {
                    context.record(node.path.clone(), old, new, descriptor.clone());
                }
            }
        }
        Ok(())
    }

    fn container_element_exited(
        &self,
        node: &ContainerElementNode<'_>,
        context: &mut ModificationContext,
    ) -> Result<(), CorrectorError> {
        for descriptor in node.property.corrections().iter().filter(|d| targets_element(d)) {
            if !context.is_applicable(descriptor, node.path) {
                continue;
            }
            let current = get_element_value(node.owner, node.property, node.kind, node.index)?;
            let Some(value_type) = current
                .runtime_type()
                .or_else(|| element_type(node.property.declared_type()).cloned())
            else {
                continue;
            };
            let outcome = self.values.correct(
                descriptor,
                &value_type,
                &current,
                &ApplierContext::new(context.root(), Some(node.owner)),
            )?;
            if let ApplierOutcome::Edited { old, new } = outcome {
                if set_element_value(node.owner, node.property, node.kind, node.index, new.clone())? {
                    context.record(node.path.clone(), old, new, descriptor.clone());
                }
            }
        }
        Ok(())
    }
}
