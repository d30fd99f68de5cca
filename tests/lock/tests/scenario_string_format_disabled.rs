//! §8 scenario 4: string format disabled.
//!
//! `{type:string,format:uuid}` with `validateFormats=false` → item is `""`;
//! with `validateFormats=true` → matches the canonical UUID v4 pattern.

use sdgen_compose::plan::{compose, ComposeOptions};
use sdgen_generate::{generate, GenerateOptions};
use serde_json::json;

#[test]
fn disabled_validate_formats_yields_empty_string() {
    let schema = json!({"type": "string", "format": "uuid"});
    let plan = compose(&schema, &ComposeOptions::default()).unwrap();
    let options = GenerateOptions {
        validate_formats: false,
        ..GenerateOptions::default()
    };
    let report = generate(&plan, &options).unwrap();
    assert_eq!(report.items[0].as_ref().unwrap(), &json!(""));
}

#[test]
fn enabled_validate_formats_yields_a_canonical_uuid() {
    let schema = json!({"type": "string", "format": "uuid"});
    let plan = compose(&schema, &ComposeOptions::default()).unwrap();
    let options = GenerateOptions {
        validate_formats: true,
        ..GenerateOptions::default()
    };
    let report = generate(&plan, &options).unwrap();
    let value = report.items[0].as_ref().unwrap().as_str().unwrap().to_string();
    let parts: Vec<&str> = value.split('-').collect();
    assert_eq!(parts.len(), 5);
    assert!(parts[2].starts_with('4'));
    assert!("89ab".contains(parts[3].chars().next().unwrap()));
}
