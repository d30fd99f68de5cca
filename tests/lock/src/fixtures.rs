//! Shared body for the `src/bin/*_fixture.rs` golden-fixture generators.
//!
//! Each binary composes a fixed schema, generates a fixed number of items
//! with a fixed seed, and prints the schema hash plus one canonical-JSON
//! line per item to stdout. Running the same binary under different
//! working directories or environments must print byte-identical output --
//! that is what the crossproc tests in `tests/` check.

use sdgen_compose::plan::{compose, ComposeOptions};
use sdgen_generate::{generate, GenerateOptions};
use sdgen_kernel::hash::canonical_json_bytes;
use serde_json::Value;

/// Compose `schema`, generate `count` items with `global_seed`, and print
/// `schema_hash=...` followed by one `item_N=...` line per item to stdout.
///
/// # Panics
///
/// Panics if the schema fails to compose or generate -- fixture schemas are
/// fixed and known-good, so a panic here means the binary itself is broken.
pub fn run_and_print(schema: &Value, global_seed: u64, count: usize) {
    let mut compose_options = ComposeOptions::default();
    compose_options.global_seed = global_seed;
    let plan = compose(schema, &compose_options).expect("fixture schema composes");
    println!("schema_hash={}", plan.schema_hash.as_str());

    let options = GenerateOptions {
        count,
        global_seed,
        ..GenerateOptions::default()
    };
    let report = generate(&plan, &options).expect("fixture plan generates");

    for (index, outcome) in report.items.iter().enumerate() {
        match outcome {
            Ok(value) => {
                let bytes = canonical_json_bytes(value).expect("item canonicalizes");
                println!("item_{index}={}", String::from_utf8_lossy(&bytes));
            }
            Err(failure) => {
                println!("item_{index}_err={}", failure.kind);
            }
        }
    }
}
