//! §8 scenario 6: unsafe `patternProperties` under presence pressure (strict).
//!
//! `{type:object,additionalProperties:false,required:['id'],patternProperties:{'.*':{type:string}}}`
//! → `.*` classifies unsafe, so it contributes no coverage; `required:['id']`
//! creates presence pressure that `additionalProperties:false` cannot
//! discharge, so the root is fatally unsat; `enumerate()` is `None` and
//! `has("id")` is `false`.

use sdgen_compose::plan::{compose, ComposeOptions};
use sdgen_kernel::diag::DiagCode;
use serde_json::json;

#[test]
fn unsafe_pattern_under_presence_pressure_is_fatal_and_uncovered() {
    let schema = json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["id"],
        "patternProperties": {".*": {"type": "string"}}
    });
    let plan = compose(&schema, &ComposeOptions::default()).expect("compose does not error on coverage unsat");

    let coverage = plan.coverage.get("#").expect("AP:false coverage recorded at root");
    assert!(coverage.enumerate().is_none(), "`.*` is unsafe, so coverage cannot be enumerated");
    assert!(!coverage.has("id"), "an unsafe pattern admits no provable coverage");

    assert!(
        plan.diag.warn.iter().any(|e| e.code == DiagCode::ApFalseUnsafePattern),
        "the unsafe `.*` key must be flagged"
    );
    assert!(
        plan.diag.fatal.iter().any(|e| e.code == DiagCode::UnsatApFalseEmptyCoverage),
        "required `id` has no coverage source, so the root is unsat"
    );
}
