use amend_api::{GroupId, Value};
use amend_core::{
    BeanModifier, BeanTraverser, CorrectionApplierRegistry, CorrectionMode, CorrectorError, GroupSequenceError,
    GroupSequenceGenerator, MetadataCache, SchemaInspector, ValueCorrector,
};
use amend_test_utils::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

fn generator() -> GroupSequenceGenerator {
    GroupSequenceGenerator::new(Arc::new(office_schema()))
}

fn modifier() -> BeanModifier {
    let schema = Arc::new(office_schema());
    let metadata = Arc::new(MetadataCache::new(SchemaInspector::new(Arc::clone(&schema))));
    BeanModifier::new(
        BeanTraverser::new(metadata, 64),
        GroupSequenceGenerator::new(schema),
        ValueCorrector::new(Arc::new(CorrectionApplierRegistry::with_defaults())),
    )
}

#[test]
fn test_sequence_preserves_order_and_deduplicates() {
    let generator = generator();
    let corporate = generator.generate_sequence(Some(groups(&[CORPORATE_GROUP]).as_slice())).unwrap();
    assert_eq!(corporate, groups(&[SLOUGH_GROUP, SWINDON_GROUP]));

    let twice = generator
        .generate_sequence(Some(groups(&[CORPORATE_GROUP, CORPORATE_GROUP]).as_slice()))
        .unwrap();
    assert_eq!(twice, corporate);

    let overlapping = generator
        .generate_sequence(Some(groups(&[SWINDON_GROUP, CORPORATE_GROUP]).as_slice()))
        .unwrap();
    assert_eq!(overlapping, groups(&[SWINDON_GROUP, SLOUGH_GROUP]));
}

#[test]
fn test_extended_markers_run_first() {
    let sequence = generator()
        .generate_sequence(Some(groups(&[REGIONAL_BRANCH_GROUP]).as_slice()))
        .unwrap();
    assert_eq!(sequence, groups(&[BRANCH_GROUP, REGIONAL_BRANCH_GROUP]));
}

#[test]
fn test_invalid_groups_fail_before_any_correction() {
    let corrector = corrector();
    let stamford = branch("  Stamford  ", person("Josh Porter").build()).build();

    let cases = [
        ("Corporate Office", "unknown"),
        ("Printer", "marker"),
        (CYCLIC_GROUP, "cycle"),
        (INVALID_GROUP_SEQUENCE, "nested"),
        (INVALID_NESTED_GROUP, "nested"),
    ];
    for (group, expected) in cases {
        let err = corrector.correct(&stamford, &groups(&[group])).unwrap_err();
        let CorrectorError::GroupSequence(inner) = &err else {
            panic!("expected group error for {group}, got {err}");
        };
        let kind = match inner {
            GroupSequenceError::UnknownGroup(_) => "unknown",
            GroupSequenceError::NotAMarker(_) => "marker",
            GroupSequenceError::Cycle(_) => "cycle",
            GroupSequenceError::NestedSequence { .. } => "nested",
        };
        assert_eq!(kind, expected, "group {group}");
        assert!(err.applied_corrections().is_empty());
    }
    assert_eq!(
        stamford.as_bean().map(|b| b.get("name")),
        Some(Value::from("  Stamford  "))
    );
}

#[test]
fn test_empty_group_list_runs_no_pass() {
    let modifier = modifier();
    let stamford = branch("  Stamford  ", person("Josh Porter").build()).build();

    let none = modifier.modify_bean(&stamford, CorrectionMode::All, Some(&[][..])).unwrap();
    assert!(none.is_empty());

    let default = modifier.modify_bean(&stamford, CorrectionMode::All, None).unwrap();
    assert_eq!(default.len(), 2);
}

proptest! {
    #[test]
    fn prop_plain_markers_keep_first_occurrence_order(
        picks in prop::collection::vec(0usize..3, 0..10)
    ) {
        let names = [BRANCH_GROUP, SLOUGH_GROUP, SWINDON_GROUP];
        let requested: Vec<GroupId> = picks.iter().map(|&i| GroupId::from(names[i])).collect();

        let mut expected: Vec<GroupId> = Vec::new();
        for group in &requested {
            if !expected.contains(group) {
                expected.push(group.clone());
            }
        }

        let sequence = generator().generate_sequence(Some(requested.as_slice())).unwrap();
        prop_assert_eq!(sequence, expected);
    }
}
