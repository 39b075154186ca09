//! Independent graphs corrected from many threads through one corrector
use amend_api::Value;
use amend_test_utils::*;
use std::thread;

#[test]
fn test_shared_corrector_across_threads() {
    let corrector = corrector();

    let results: Vec<(Value, usize)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let corrector = &corrector;
                scope.spawn(move || {
                    let branch = branch(&format!("  Branch {i}  "), person("Temp").build())
                        .with("assets", Value::List(vec![chair(" Ikea ", None)]))
                        .build();
                    let applied = corrector.correct(&branch, &[]).unwrap();
                    (branch, applied.len())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, (branch, applied)) in results.iter().enumerate() {
        // name, chair brand, chair assignedTo, establishedYear
        assert_eq!(*applied, 4);
        let name = branch.as_bean().map(|b| b.get("name"));
        assert_eq!(name, Some(Value::from(format!("Branch {i}"))));
    }
    assert!(corrector.metadata().len() >= 3);
}
