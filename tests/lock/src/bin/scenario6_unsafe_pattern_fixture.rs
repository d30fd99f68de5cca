//! Golden fixture generator for §8 scenario 6: unsafe `patternProperties`
//! under `additionalProperties: false` presence pressure.
//!
//! This schema is unsatisfiable at the root, so this fixture prints the
//! schema hash and the plan's recorded fatal diagnostic codes instead of
//! generated items -- there is nothing to generate.

fn main() {
    let schema = serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["id"],
        "patternProperties": {".*": {"type": "string"}}
    });
    let plan = sdgen_compose::plan::compose(&schema, &sdgen_compose::plan::ComposeOptions::default())
        .expect("fixture schema composes");
    println!("schema_hash={}", plan.schema_hash.as_str());
    let mut codes: Vec<&str> = plan.diag.fatal.iter().map(|entry| entry.code.as_str()).collect();
    codes.sort_unstable();
    for code in codes {
        println!("fatal={code}");
    }
}
