//! §8 invariant 5: `oneOf` exclusivity repair either produces a value that
//! no longer satisfies any sibling branch, or fails loudly -- it never
//! silently returns a value that still satisfies more than one branch.

use sdgen_generate::exclusivity::enforce_one_of_exclusivity;
use sdgen_generate::kinds::{CallCounters, GenCtx};
use sdgen_generate::runner::GenerateOptions;
use sdgen_kernel::ajv::{AjvMetadata, Dialect, ValidationError, ValidatorAdapter};
use sdgen_kernel::canon::CanonicalNode;
use sdgen_kernel::diag::DiagnosticEnvelope;
use serde_json::{json, Value};

/// A deliberately narrow validator: only enough of `const`/`type` semantics
/// to drive the two exclusivity scenarios below.
struct MockValidator {
    meta: AjvMetadata,
}

impl MockValidator {
    fn new() -> Self {
        Self {
            meta: AjvMetadata {
                major: 8,
                class: "mock".to_string(),
                flags: Default::default(),
                dialect: Dialect::Draft202012,
                validate_formats: false,
                multiple_of_precision: 9,
            },
        }
    }
}

impl ValidatorAdapter for MockValidator {
    fn validate(&self, schema: &Value, instance: &Value) -> Result<(), Vec<ValidationError>> {
        if let Some(expected) = schema.get("const") {
            return if expected == instance {
                Ok(())
            } else {
                Err(vec![ValidationError {
                    instance_path: String::new(),
                    schema_path: "#/const".to_string(),
                    message: "const mismatch".to_string(),
                }])
            };
        }
        if schema.get("type").and_then(Value::as_str) == Some("string") {
            return if instance.is_string() {
                Ok(())
            } else {
                Err(vec![ValidationError {
                    instance_path: String::new(),
                    schema_path: "#/type".to_string(),
                    message: "not a string".to_string(),
                }])
            };
        }
        Ok(())
    }

    fn metadata(&self) -> &AjvMetadata {
        &self.meta
    }
}

fn dummy_plan() -> sdgen_compose::plan::ComposePlan {
    sdgen_compose::plan::compose(&json!(true), &sdgen_compose::plan::ComposeOptions::default()).unwrap()
}

#[test]
fn a_resolvable_const_collision_is_tweaked_away_from_every_sibling() {
    let plan = dummy_plan();
    let validator = MockValidator::new();
    let options = GenerateOptions {
        validator: Some(&validator),
        ..GenerateOptions::default()
    };
    let ctx = GenCtx { plan: &plan, options: &options };

    let chosen_schema = json!({"const": "ab"});
    let sibling_schema = json!({"const": "ab"});
    let siblings = vec![
        CanonicalNode::Value { origin: "#/oneOf/0".into(), schema: chosen_schema },
        CanonicalNode::Value { origin: "#/oneOf/1".into(), schema: sibling_schema.clone() },
    ];

    let mut diag = DiagnosticEnvelope::new();
    let mut counters = CallCounters::new();
    let result = enforce_one_of_exclusivity(
        json!("ab"),
        &siblings[0],
        &siblings,
        0,
        "#/oneOf",
        &ctx,
        &mut diag,
        &mut counters,
    )
    .expect("a string tweak resolves an exact-const collision");

    assert_ne!(result, json!("ab"), "the tweak must change the value");
    assert!(
        validator.validate(&sibling_schema, &result).is_err(),
        "the tweaked value must no longer satisfy the sibling branch"
    );
}

#[test]
fn an_unresolvable_collision_against_a_permissive_sibling_fails_loudly() {
    let plan = dummy_plan();
    let validator = MockValidator::new();
    let options = GenerateOptions {
        validator: Some(&validator),
        ..GenerateOptions::default()
    };
    let ctx = GenCtx { plan: &plan, options: &options };

    let chosen_schema = json!({"const": "z"});
    let sibling_schema = json!({"type": "string"});
    let siblings = vec![
        CanonicalNode::Value { origin: "#/oneOf/0".into(), schema: chosen_schema },
        CanonicalNode::Value { origin: "#/oneOf/1".into(), schema: sibling_schema },
    ];

    let mut diag = DiagnosticEnvelope::new();
    let mut counters = CallCounters::new();
    let result = enforce_one_of_exclusivity(
        json!("z"),
        &siblings[0],
        &siblings,
        0,
        "#/oneOf",
        &ctx,
        &mut diag,
        &mut counters,
    );

    assert!(result.is_err(), "no tweak can escape `type:string`, so this must fail rather than return a conflicting value");
}
