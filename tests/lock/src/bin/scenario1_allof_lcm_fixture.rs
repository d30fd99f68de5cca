//! Golden fixture generator for §8 scenario 1: `allOf` numeric LCM merge.
//!
//! Usage: `scenario1_allof_lcm_fixture`
//! Output: `schema_hash=...` then one `item_N=<canonical json>` line per item.

fn main() {
    sdgen_lock_tests::fixtures::run_and_print(
        &serde_json::json!({
            "allOf": [
                {"type": "integer", "minimum": -5, "multipleOf": 6},
                {"type": "integer", "maximum": 10, "multipleOf": 4}
            ]
        }),
        1,
        5,
    );
}
