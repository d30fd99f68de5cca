//! Golden fixture generator for §8 scenario 4: string `format` gated by
//! `validateFormats`.

fn main() {
    sdgen_lock_tests::fixtures::run_and_print(
        &serde_json::json!({
            "type": "string",
            "format": "uuid"
        }),
        4,
        5,
    );
}
