//! Visitor seam of the traverser

use crate::error::CorrectorError;
use crate::traversal::node::{BeanNode, ContainerElementNode, PropertyNode};

/// Hooks invoked around every node of a walk
///
/// `C` is caller state threaded through the whole walk. Every hook defaults
/// to doing nothing; an error from any hook aborts the walk.
pub trait TraversalCallback<C> {
    fn bean_entered(&self, _node: &BeanNode<'_>, _context: &mut C) -> Result<(), CorrectorError> {
        Ok(())
    }

    fn bean_exited(&self, _node: &BeanNode<'_>, _context: &mut C) -> Result<(), CorrectorError> {
        Ok(())
    }

    fn property_entered(&self, _node: &PropertyNode<'_>, _context: &mut C) -> Result<(), CorrectorError> {
        Ok(())
    }

    fn property_exited(&self, _node: &PropertyNode<'_>, _context: &mut C) -> Result<(), CorrectorError> {
        Ok(())
    }

    fn container_element_entered(
        &self,
        _node: &ContainerElementNode<'_>,
        _context: &mut C,
    ) -> Result<(), CorrectorError> {
        Ok(())
    }

    fn container_element_exited(
        &self,
        _node: &ContainerElementNode<'_>,
        _context: &mut C,
    ) -> Result<(), CorrectorError> {
        Ok(())
    }
}
