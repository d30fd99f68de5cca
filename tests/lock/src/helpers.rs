//! Shared plan/report construction for the end-to-end lock tests.

use sdgen_compose::plan::{compose, ComposeOptions, ComposePlan};
use sdgen_generate::{generate, GenerateOptions, GenerateReport};
use serde_json::Value;

/// Compose `schema` with default options and the given `global_seed`.
///
/// # Panics
///
/// Panics if the schema is not a valid plan input (oversized, or the root
/// shape is rejected by Normalize) -- the lock tests only feed valid schemas.
#[must_use]
pub fn compose_default(schema: &Value, global_seed: u64) -> ComposePlan {
    let mut options = ComposeOptions::default();
    options.global_seed = global_seed;
    compose(schema, &options).expect("schema composes")
}

/// Generate `count` items for `plan` with default options and the given seed.
///
/// # Panics
///
/// Panics if Generate rejects the plan outright (literal `false` root, or a
/// fatal diagnostic already on record) -- the lock tests only feed
/// generatable plans.
#[must_use]
pub fn generate_default(plan: &ComposePlan, count: usize, global_seed: u64) -> GenerateReport {
    let options = GenerateOptions {
        count,
        global_seed,
        ..GenerateOptions::default()
    };
    generate(plan, &options).expect("plan generates")
}
