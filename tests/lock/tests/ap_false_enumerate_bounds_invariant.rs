//! §8 invariant 3: for an `additionalProperties:false` node, `enumerate()`
//! (when defined) is a sorted, deduplicated subset of `has`, bounded by
//! `ENUM_CAP`.

use sdgen_compose::coverage::ENUM_CAP;
use sdgen_lock_tests::helpers::compose_default;
use serde_json::json;
use std::collections::BTreeSet;

#[test]
fn enumerate_is_a_subset_of_has_and_is_sorted_and_deduped() {
    let schema = json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {"a": {}, "b": {}, "c": {}},
        "patternProperties": {"^d$": {}},
        "required": ["a"]
    });
    let plan = compose_default(&schema, 1);
    let coverage = plan.coverage.get("#").expect("coverage recorded at root");

    let names = coverage.enumerate().expect("this schema is fully enumerable");
    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(names, sorted, "enumerate() must already be sorted and deduped");
    assert!(names.len() <= ENUM_CAP);

    for name in &names {
        assert!(coverage.has(name), "enumerate() produced {name} that has() disagrees with");
    }

    let as_set: BTreeSet<_> = names.iter().cloned().collect();
    assert_eq!(as_set, ["a", "b", "c", "d"].into_iter().map(String::from).collect());
}

#[test]
fn unsafe_pattern_makes_the_entry_non_enumerable_even_though_named_keys_still_have() {
    let schema = json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {"a": {}},
        "patternProperties": {".*": {}},
        "required": ["a"]
    });
    let plan = compose_default(&schema, 1);
    let coverage = plan.coverage.get("#").expect("coverage recorded at root");
    assert!(coverage.enumerate().is_none());
    assert!(coverage.has("a"), "named property a is still provably admitted");
}
