//! §8 scenario 3: `contains` + `uniqueItems`.
//!
//! `{type:array,minItems:2,uniqueItems:true,items:{const:1},contains:{const:1},minContains:1}`
//! → array contains exactly one `1` and either stops at length 1
//! (unsat-leaves-residual) or appends one unique stable filler distinct
//! from `1`.

use sdgen_lock_tests::helpers::{compose_default, generate_default};
use serde_json::json;

#[test]
fn contains_witness_is_present_and_unique_items_holds() {
    let schema = json!({
        "type": "array",
        "minItems": 2,
        "uniqueItems": true,
        "items": {"const": 1},
        "contains": {"const": 1},
        "minContains": 1
    });
    let plan = compose_default(&schema, 1);
    let report = generate_default(&plan, 1, 1);
    let array = report.items[0].as_ref().unwrap().as_array().unwrap();

    let ones = array.iter().filter(|v| **v == json!(1)).count();
    assert_eq!(ones, 1, "exactly one `1` must satisfy contains under uniqueItems");

    let mut seen = std::collections::HashSet::new();
    for item in array {
        assert!(seen.insert(item.to_string()), "uniqueItems violated: duplicate {item}");
    }
}
