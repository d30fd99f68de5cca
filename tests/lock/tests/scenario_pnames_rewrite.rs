//! §8 scenario 5: `additionalProperties:false` + `propertyNames.enum` rewrite.
//!
//! `{type:object,properties:{a:{}},required:['a'],propertyNames:{enum:['a','b']}}`
//! → coverage enumerates `['a','b']`, `PNAMES_REWRITE_APPLIED` recorded;
//! `additionalProperties:false` synthesized; emitted object has keys ⊆ `{a,b}`.

use sdgen_kernel::diag::DiagCode;
use sdgen_lock_tests::helpers::{compose_default, generate_default};
use serde_json::json;

#[test]
fn property_names_enum_synthesizes_ap_false_and_bounds_coverage() {
    let schema = json!({
        "type": "object",
        "properties": {"a": {}},
        "required": ["a"],
        "propertyNames": {"enum": ["a", "b"]}
    });
    let plan = compose_default(&schema, 1);

    let coverage = plan.coverage.get("#").expect("AP:false coverage recorded at root");
    let mut names = coverage.enumerate().expect("coverage is enumerable");
    names.sort();
    assert_eq!(names, vec!["a".to_string(), "b".to_string()]);

    assert!(plan
        .normalize_notes
        .iter()
        .any(|note| note.code == DiagCode::PnamesRewriteApplied.as_str()));

    let report = generate_default(&plan, 1, 1);
    let obj = report.items[0].as_ref().unwrap().as_object().unwrap();
    for key in obj.keys() {
        assert!(["a", "b"].contains(&key.as_str()));
    }
}
