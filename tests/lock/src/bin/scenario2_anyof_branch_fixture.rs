//! Golden fixture generator for §8 scenario 2: `anyOf` branch chosen by Compose.

fn main() {
    sdgen_lock_tests::fixtures::run_and_print(
        &serde_json::json!({
            "anyOf": [
                {"type": "string", "minLength": 10},
                {"type": "integer", "minimum": 100}
            ]
        }),
        2,
        5,
    );
}
