//! §8 invariant 1: `ptrMap(canonPath)` is defined for every canonical node;
//! `revPtrMap` is its exact inverse with sorted value lists.

use sdgen_kernel::canon::CanonicalNode;
use sdgen_lock_tests::helpers::compose_default;
use serde_json::json;

fn collect_canon_paths(node: &CanonicalNode, path: &str, out: &mut Vec<String>) {
    out.push(path.to_string());
    match node {
        CanonicalNode::Array { children, .. } => {
            for (i, child) in children.iter().enumerate() {
                collect_canon_paths(child, &format!("{path}/{i}"), out);
            }
        }
        CanonicalNode::Object { entries, .. } => {
            for (key, child) in entries.iter() {
                collect_canon_paths(child, &sdgen_kernel::canon::pointer::push_token(path, key), out);
            }
        }
        CanonicalNode::Value { .. } => {}
    }
}

#[test]
fn ptr_map_covers_every_canonical_node() {
    let schema = json!({
        "type": "object",
        "properties": {"a": {"type": "string"}, "b": {"anyOf": [{"const": 1}, {"const": 2}]}},
        "required": ["a"]
    });
    let plan = compose_default(&schema, 1);
    let mut paths = Vec::new();
    collect_canon_paths(&plan.root, "#", &mut paths);
    for path in &paths {
        assert!(plan.ptr_map.get(path).is_some(), "missing ptrMap entry for {path}");
    }
}

#[test]
fn rev_ptr_map_is_exact_inverse() {
    let schema = json!({
        "type": "object",
        "properties": {"a": {"type": "string"}},
        "required": ["a"]
    });
    let plan = compose_default(&schema, 1);
    let rev = plan.ptr_map.invert();
    assert!(rev.is_exact_inverse_of(&plan.ptr_map));

    let mut paths = Vec::new();
    collect_canon_paths(&plan.root, "#", &mut paths);
    for path in &paths {
        let origin = plan.ptr_map.get(path).unwrap();
        let back = rev.get(origin).expect("origin present in revPtrMap");
        assert!(back.contains(path), "revPtrMap missing {path} under origin {origin}");
    }
}
