//! Resolution of requested groups into an ordered pass list

use crate::error::GroupSequenceError;
use amend_api::{GroupId, GroupKind, Schema};
use std::collections::HashSet;
use std::sync::Arc;

/// Resolves requested groups into the ordered list of passes to run
///
/// Sequences expand to their members in order; plain markers are preceded
/// by the markers they extend. Each group appears once, at its first use.
#[derive(Debug, Clone)]
pub struct GroupSequenceGenerator {
    schema: Arc<Schema>,
}

struct Resolution {
    resolved: Vec<GroupId>,
    visited: HashSet<GroupId>,
    processing: HashSet<GroupId>,
}

impl GroupSequenceGenerator {
    /// Create generator over the groups declared in `schema`
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// Flatten `groups` into an ordered, de-duplicated sequence
    ///
    /// `None` yields the default group alone; an empty slice yields an empty
    /// sequence.
    ///
    /// # Errors
    /// Returns [`GroupSequenceError`] for undeclared or concrete groups,
    /// cycles, and sequences containing sequences.
    pub fn generate_sequence(
        &self,
        groups: Option<&[GroupId]>,
    ) -> Result<Vec<GroupId>, GroupSequenceError> {
        let Some(groups) = groups else {
            return Ok(vec![GroupId::default_group()]);
        };
        let mut state = Resolution {
            resolved: Vec::new(),
            visited: HashSet::new(),
            processing: HashSet::new(),
        };
        for group in groups {
            self.resolve(group, &mut state)?;
        }
        Ok(state.resolved)
    }

    fn resolve(&self, group: &GroupId, state: &mut Resolution) -> Result<(), GroupSequenceError> {
        if state.visited.contains(group) {
            return Ok(());
        }
        let definition = self
            .schema
            .group(group)
            .ok_or_else(|| GroupSequenceError::UnknownGroup(group.clone()))?;
        if definition.kind() != GroupKind::Marker {
            return Err(GroupSequenceError::NotAMarker(group.clone()));
        }
        if !state.processing.insert(group.clone()) {
            return Err(GroupSequenceError::Cycle(group.clone()));
        }

        if let Some(members) = definition.members() {
            if let Some(nested) = members
                .iter()
                .find(|m| self.schema.group(m).is_some_and(|d| d.is_sequence()))
            {
                return Err(GroupSequenceError::NestedSequence {
                    sequence: group.clone(),
                    member: nested.clone(),
                });
            }
            for member in members {
                self.resolve(member, state)?;
            }
        } else {
            for parent in definition.parents() {
                self.resolve(parent, state)?;
            }
            state.resolved.push(group.clone());
        }

        state.processing.remove(group);
        state.visited.insert(group.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amend_api::GroupDefinition;
    use proptest::prelude::*;

    fn ids(names: &[&str]) -> Vec<GroupId> {
        names.iter().map(|n| GroupId::from(*n)).collect()
    }

    fn generator() -> GroupSequenceGenerator {
        let schema = Schema::builder()
            .group(GroupDefinition::marker("A"))
            .group(GroupDefinition::marker("B"))
            .group(GroupDefinition::marker("C").extends(ids(&["A"])))
            .group(GroupDefinition::sequence("G", ids(&["A", "B"])))
            .group(GroupDefinition::sequence("Outer", ids(&["A", "G"])))
            .group(GroupDefinition::marker("X").extends(ids(&["Y"])))
            .group(GroupDefinition::marker("Y").extends(ids(&["X"])))
            .group(GroupDefinition::concrete("Office"))
            .build();
        GroupSequenceGenerator::new(Arc::new(schema))
    }

    #[test]
    fn none_yields_default_group() {
        assert_eq!(
            generator().generate_sequence(None).unwrap(),
            vec![GroupId::default_group()]
        );
    }

    #[test]
    fn empty_yields_empty() {
        assert!(generator().generate_sequence(Some(&[][..])).unwrap().is_empty());
    }

    #[test]
    fn sequence_preserves_order() {
        let sequence = generator().generate_sequence(Some(ids(&["G"]).as_slice())).unwrap();
        assert_eq!(sequence, ids(&["A", "B"]));
    }

    #[test]
    fn repeated_request_is_deduplicated() {
        let gen = generator();
        assert_eq!(
            gen.generate_sequence(Some(ids(&["G", "G"]).as_slice())).unwrap(),
            gen.generate_sequence(Some(ids(&["G"]).as_slice())).unwrap()
        );
    }

    #[test]
    fn supertypes_come_first() {
        let sequence = generator().generate_sequence(Some(ids(&["C", "A"]).as_slice())).unwrap();
        assert_eq!(sequence, ids(&["A", "C"]));
    }

    #[test]
    fn cycle_is_rejected() {
        let err = generator().generate_sequence(Some(ids(&["X"]).as_slice())).unwrap_err();
        assert!(matches!(err, GroupSequenceError::Cycle(_)));
    }

    #[test]
    fn nested_sequence_is_rejected() {
        let err = generator().generate_sequence(Some(ids(&["Outer"]).as_slice())).unwrap_err();
        assert_eq!(
            err,
            GroupSequenceError::NestedSequence {
                sequence: GroupId::from("Outer"),
                member: GroupId::from("G"),
            }
        );
    }

    #[test]
    fn concrete_group_is_rejected() {
        let err = generator().generate_sequence(Some(ids(&["Office"]).as_slice())).unwrap_err();
        assert_eq!(err, GroupSequenceError::NotAMarker(GroupId::from("Office")));
    }

    #[test]
    fn unknown_group_is_rejected() {
        let err = generator().generate_sequence(Some(ids(&["Nope"]).as_slice())).unwrap_err();
        assert_eq!(err, GroupSequenceError::UnknownGroup(GroupId::from("Nope")));
    }

    proptest! {
        #[test]
        fn prop_output_has_no_duplicates(picks in prop::collection::vec(0usize..4, 0..10)) {
            let pool = ["A", "B", "C", "G"];
            let requested: Vec<GroupId> = picks.iter().map(|&i| GroupId::from(pool[i])).collect();
            let sequence = generator().generate_sequence(Some(&requested)).unwrap();
            let unique: HashSet<_> = sequence.iter().collect();
            prop_assert_eq!(unique.len(), sequence.len());
        }
    }
}
