//! Golden fixture generator for §8 scenario 5: `additionalProperties: false`
//! plus a `propertyNames.enum` rewrite.

fn main() {
    sdgen_lock_tests::fixtures::run_and_print(
        &serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {"a": {"type": "integer"}},
            "required": ["a"],
            "propertyNames": {"enum": ["a", "b", "c"]}
        }),
        5,
        5,
    );
}
