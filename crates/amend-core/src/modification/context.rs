//! State carried through one `modify_bean` invocation

use amend_api::{
    AppliedCorrection, ConstraintType, CorrectionDescriptor, GroupId, Path, Value, Violation,
};
use std::collections::{BTreeSet, HashMap};

/// Which corrections a modification considers
#[derive(Debug, Clone, Copy)]
pub enum CorrectionMode<'a> {
    /// Every group-applicable correction
    All,

    /// Only corrections whose constraint filter matches a violation recorded
    /// at the same path
    ViolationsOnly(&'a [Violation]),
}

/// Accumulated state of one modification, shared by all of its passes
#[derive(Debug)]
pub struct ModificationContext {
    root: Value,
    current_group: GroupId,
    violations: Option<HashMap<String, BTreeSet<ConstraintType>>>,
    applied: Vec<AppliedCorrection>,
}

impl ModificationContext {
    /// Create context for correcting `root`
    ///
    /// Violations are grouped by rendered path once, up front.
    #[must_use]
    pub fn new(root: Value, mode: CorrectionMode<'_>) -> Self {
        let violations = match mode {
            CorrectionMode::All => None,
            CorrectionMode::ViolationsOnly(violations) => {
                let mut by_path: HashMap<String, BTreeSet<ConstraintType>> = HashMap::new();
                for violation in violations {
                    by_path
                        .entry(violation.path.clone())
                        .or_default()
                        .insert(violation.constraint.clone());
                }
                Some(by_path)
            }
        };
        Self {
            root,
            current_group: GroupId::default_group(),
            violations,
            applied: Vec::new(),
        }
    }

    /// Start the pass for `group`
    pub fn begin_pass(&mut self, group: GroupId) {
        self.current_group = group;
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    #[inline]
    #[must_use]
    pub fn current_group(&self) -> &GroupId {
        &self.current_group
    }

    /// Check if `descriptor` runs at `path` in the current pass
    #[must_use]
    pub fn is_applicable(&self, descriptor: &CorrectionDescriptor, path: &Path) -> bool {
        let groups = descriptor.groups();
        let in_group = if groups.is_empty() {
            self.current_group.is_default()
        } else {
            groups.contains(&self.current_group)
        };
        if !in_group {
            return false;
        }
        let Some(violations) = &self.violations else {
            return true;
        };
        let filter = descriptor.constraint_filter();
        !filter.is_empty()
            && violations
                .get(&path.to_string())
                .is_some_and(|found| !found.is_disjoint(filter))
    }

    /// Record a write that took effect
    pub fn record(&mut self, path: Path, old_value: Value, new_value: Value, descriptor: CorrectionDescriptor) {
        tracing::debug!(
            path = %path,
            annotation = %descriptor.annotation_type(),
            group = %self.current_group,
            "applied correction"
        );
        self.applied.push(AppliedCorrection::new(
            self.root.clone(),
            path,
            old_value,
            new_value,
            descriptor,
        ));
    }

    /// Corrections recorded so far, across all passes
    #[inline]
    #[must_use]
    pub fn applied(&self) -> &[AppliedCorrection] {
        &self.applied
    }

    #[must_use]
    pub fn into_applied(self) -> Vec<AppliedCorrection> {
        self.applied
    }
}
