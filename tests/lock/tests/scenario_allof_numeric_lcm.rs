//! §8 scenario 1: `allOf` numeric LCM.
//!
//! `{allOf:[{type:integer,minimum:-5,multipleOf:6},{type:integer,maximum:10,multipleOf:4}]}`
//! → item is an integer, multiple of 12, within `[-5,10]`; `0` is acceptable.

use sdgen_lock_tests::helpers::{compose_default, generate_default};
use serde_json::json;

#[test]
fn allof_merges_multiple_of_via_lcm_and_respects_bounds() {
    let schema = json!({
        "allOf": [
            {"type": "integer", "minimum": -5, "multipleOf": 6},
            {"type": "integer", "maximum": 10, "multipleOf": 4}
        ]
    });
    let plan = compose_default(&schema, 1);
    let report = generate_default(&plan, 1, 1);
    let value = report.items[0].as_ref().unwrap();
    let n = value.as_i64().expect("integer item");
    assert_eq!(n % 12, 0);
    assert!((-5..=10).contains(&n));
}
