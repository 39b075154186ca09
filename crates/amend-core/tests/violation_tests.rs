use amend_api::{Value, Violation};
use amend_core::CorrectorConfig;
use amend_test_utils::*;
use pretty_assertions::assert_eq;

fn violations(json: &str) -> Vec<Violation> {
    serde_json::from_str(json).unwrap()
}

fn get(value: &Value, property: &str) -> Value {
    value.as_bean().map_or(Value::Null, |b| b.get(property))
}

#[test]
fn test_only_violated_paths_are_corrected() {
    let stamford = branch("  Stamford  ", person("Josh Porter").build()).build();
    let facts = violations(r#"[{ "path": "establishedYear", "constraint": "NotNull" }]"#);

    let applied = corrector().correct_violations(&stamford, &facts, &[]).unwrap();

    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].path().to_string(), "establishedYear");
    assert_eq!(applied[0].new_value(), &Value::I32(2001));
    // trim has no constraint filter, so it never runs in this mode
    assert_eq!(get(&stamford, "name"), Value::from("  Stamford  "));
}

#[test]
fn test_nested_violation_paths() {
    let stamford = branch("Stamford", person("Josh Porter").build()).build();
    let day = office_day(stamford.clone()).build();

    let elsewhere = violations(r#"[{ "path": "branch.address", "constraint": "NotNull" }]"#);
    assert!(corrector().correct_violations(&day, &elsewhere, &[]).unwrap().is_empty());
    assert!(get(&stamford, "establishedYear").is_null());

    let here = violations(r#"[{ "path": "branch.establishedYear", "constraint": "NotNull" }]"#);
    let applied = corrector().correct_violations(&day, &here, &[]).unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].path().to_string(), "branch.establishedYear");
    assert_eq!(get(&stamford, "establishedYear"), Value::I32(2001));
}

#[test]
fn test_constraint_must_match_filter() {
    let stamford = branch("Stamford", person("Josh Porter").build()).build();
    let facts = vec![Violation::new("establishedYear", "Size")];
    assert!(corrector().correct_violations(&stamford, &facts, &[]).unwrap().is_empty());
}

#[test]
fn test_group_and_violation_both_required() {
    let facts = vec![
        Violation::new("salary", VALID_MONEY),
        Violation::new("salary.amount", NOT_NULL),
    ];

    let toby = person("Toby Flenderson").build();
    assert!(corrector().correct_violations(&toby, &facts, &[]).unwrap().is_empty());

    let applied = corrector()
        .correct_violations(&toby, &facts, &groups(&[CORPORATE_GROUP]))
        .unwrap();
    let paths: Vec<String> = applied.iter().map(|c| c.path().to_string()).collect();
    assert_eq!(paths, vec!["salary", "salary.amount"]);
    // catchPhrase default has no filter
    assert!(get(&toby, "catchPhrase").is_null());
}

#[test]
fn test_config_loads_from_json() {
    let config: CorrectorConfig = serde_json::from_str(r#"{ "max_traversal_depth": 8 }"#).unwrap();
    assert_eq!(config, CorrectorConfig::new().with_max_traversal_depth(8));

    let corrector = corrector_with(config);
    assert_eq!(corrector.config().max_traversal_depth, 8);
    assert!(!corrector.registry().is_empty());
}
