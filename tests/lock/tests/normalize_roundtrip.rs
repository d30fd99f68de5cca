//! §8 round-trip property: `Normalize(Normalize(S)) = Normalize(S)`.
//!
//! Re-normalizing an already-normalized schema document must reach a fixed
//! point: same canonical tree, same `ptrMap`, same notes.

use sdgen_compose::normalize::{normalize, NormalizeOptions};
use sdgen_kernel::hash::canonical_json_bytes;
use serde_json::json;

fn node_to_value(node: &sdgen_kernel::canon::CanonicalNode) -> serde_json::Value {
    match node {
        sdgen_kernel::canon::CanonicalNode::Value { schema, .. } => schema.clone(),
        sdgen_kernel::canon::CanonicalNode::Array { children, .. } => {
            serde_json::Value::Array(children.iter().map(node_to_value).collect())
        }
        sdgen_kernel::canon::CanonicalNode::Object { entries, .. } => {
            let mut map = serde_json::Map::new();
            for (key, child) in entries.iter() {
                map.insert(key.to_string(), node_to_value(child));
            }
            serde_json::Value::Object(map)
        }
    }
}

fn assert_roundtrip_is_a_fixed_point(schema: &serde_json::Value) {
    let once = normalize(schema, &NormalizeOptions::default()).expect("first normalize succeeds");
    let once_schema = node_to_value(&once.root);
    let twice = normalize(&once_schema, &NormalizeOptions::default()).expect("second normalize succeeds");
    let twice_schema = node_to_value(&twice.root);

    assert_eq!(
        canonical_json_bytes(&once_schema).expect("once canonicalizes"),
        canonical_json_bytes(&twice_schema).expect("twice canonicalizes"),
        "re-normalizing an already-normalized schema must not change its shape"
    );
}

#[test]
fn plain_object_schema_is_a_fixed_point() {
    assert_roundtrip_is_a_fixed_point(&json!({
        "type": "object",
        "properties": {"a": {"type": "string"}, "b": {"type": "integer"}},
        "required": ["a"]
    }));
}

#[test]
fn allof_merged_numeric_schema_is_a_fixed_point() {
    assert_roundtrip_is_a_fixed_point(&json!({
        "allOf": [
            {"type": "integer", "minimum": -5, "multipleOf": 6},
            {"type": "integer", "maximum": 10, "multipleOf": 4}
        ]
    }));
}

#[test]
fn property_names_enum_rewrite_is_a_fixed_point() {
    assert_roundtrip_is_a_fixed_point(&json!({
        "type": "object",
        "properties": {"a": {}},
        "required": ["a"],
        "propertyNames": {"enum": ["a", "b"]}
    }));
}
