//! Shared helpers for the sdgen benchmark suites.

use sdgen_compose::plan::{compose, ComposeOptions, ComposePlan};
use sdgen_generate::{generate, GenerateOptions, GenerateReport};
use serde_json::Value;

/// A named schema regime, used to benchmark the pipeline across a spread of
/// structural shapes rather than a single happy-path document.
pub struct Regime {
    pub name: &'static str,
    pub schema: Value,
}

/// The regimes exercised by every bench in this crate. Kept in one place so
/// `normalize_regimes`, `compose_regimes`, and `generate_regimes` all measure
/// the same spread of shapes.
#[must_use]
pub fn regimes() -> Vec<Regime> {
    vec![
        Regime {
            name: "flat_object",
            schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "id": {"type": "string", "format": "uuid"},
                    "count": {"type": "integer", "minimum": 0, "maximum": 1000},
                    "label": {"type": "string", "minLength": 1, "maxLength": 32}
                },
                "required": ["id", "count"]
            }),
        },
        Regime {
            name: "allof_numeric_merge",
            schema: serde_json::json!({
                "allOf": [
                    {"type": "integer", "minimum": -100, "multipleOf": 6},
                    {"type": "integer", "maximum": 100, "multipleOf": 4}
                ]
            }),
        },
        Regime {
            name: "anyof_branches",
            schema: serde_json::json!({
                "anyOf": [
                    {"const": 1}, {"const": 2}, {"const": 3}, {"const": 4}, {"const": 5}
                ]
            }),
        },
        Regime {
            name: "ap_false_with_patterns",
            schema: serde_json::json!({
                "type": "object",
                "additionalProperties": false,
                "properties": {"a": {}, "b": {}},
                "patternProperties": {"^x[0-9]$": {}},
                "required": ["a"]
            }),
        },
        Regime {
            name: "contains_unique_array",
            schema: serde_json::json!({
                "type": "array",
                "minItems": 3,
                "maxItems": 6,
                "uniqueItems": true,
                "items": {"type": "integer", "minimum": 0, "maximum": 50},
                "contains": {"const": 7},
                "minContains": 1
            }),
        },
    ]
}

/// Compose a regime's schema with default options and a fixed seed.
///
/// # Panics
///
/// Panics if the regime's schema fails to compose -- these fixtures are
/// chosen to be composable, so a failure here means the fixture itself
/// regressed.
#[must_use]
pub fn compose_regime(regime: &Regime, global_seed: u64) -> ComposePlan {
    let mut options = ComposeOptions::default();
    options.global_seed = global_seed;
    compose(&regime.schema, &options).expect("benchmark regime composes")
}

/// Generate `count` items for an already-composed plan.
///
/// # Panics
///
/// Panics if Generate rejects the plan -- benchmark regimes are chosen to
/// be generatable.
#[must_use]
pub fn generate_regime(plan: &ComposePlan, count: usize, global_seed: u64) -> GenerateReport {
    let options = GenerateOptions {
        count,
        global_seed,
        ..GenerateOptions::default()
    };
    generate(plan, &options).expect("benchmark regime generates")
}
