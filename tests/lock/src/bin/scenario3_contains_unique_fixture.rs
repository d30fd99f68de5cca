//! Golden fixture generator for §8 scenario 3: `contains` + `uniqueItems`.

fn main() {
    sdgen_lock_tests::fixtures::run_and_print(
        &serde_json::json!({
            "type": "array",
            "items": {"type": "integer", "minimum": 0, "maximum": 20},
            "contains": {"const": 7},
            "minItems": 4,
            "maxItems": 8,
            "uniqueItems": true
        }),
        3,
        5,
    );
}
