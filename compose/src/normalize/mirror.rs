//! Isomorphic mirror: walks the rewritten `serde_json::Value` tree into a
//! [`CanonicalNode`] tree, consulting [`OriginOverrides`] so synthesized
//! structure (e.g. a `propertyNames`-enum rewrite) reports provenance back
//! to the keyword that produced it rather than to itself.

use sdgen_kernel::canon::{pointer::push_index, CanonicalNode, ObjectEntries, PtrMap};
use serde_json::Value;

use super::rewrite::OriginOverrides;

/// Mirror `value` (assumed already rewritten) into a `CanonicalNode` tree
/// rooted at `canon_path`, recording every visited path into `ptr_map`.
pub fn mirror(
    value: &Value,
    canon_path: &str,
    overrides: &OriginOverrides,
    ptr_map: &mut PtrMap,
) -> CanonicalNode {
    let origin = overrides.resolve(canon_path);
    ptr_map.insert(canon_path.to_string(), origin.clone());

    match value {
        Value::Array(items) => {
            let children = items
                .iter()
                .enumerate()
                .map(|(i, child)| {
                    let child_path = push_index(canon_path, i);
                    mirror(child, &child_path, overrides, ptr_map)
                })
                .collect();
            CanonicalNode::Array { origin, children }
        }
        Value::Object(map) => {
            let mut entries = ObjectEntries::new();
            for (key, child) in map {
                let child_path = sdgen_kernel::canon::pointer::push_token(canon_path, key);
                let node = mirror(child, &child_path, overrides, ptr_map);
                entries.push(key.clone(), node);
            }
            CanonicalNode::Object { origin, entries }
        }
        scalar => CanonicalNode::Value {
            origin,
            schema: scalar.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mirrors_every_position_including_scalars() {
        let value = json!({"type": "string", "minLength": 3});
        let overrides = OriginOverrides::new();
        let mut ptr_map = PtrMap::new();
        let root = mirror(&value, "#", &overrides, &mut ptr_map);
        let CanonicalNode::Object { entries, .. } = root else {
            panic!("expected object node");
        };
        assert!(entries.get("type").unwrap().as_schema_value().is_some());
        assert_eq!(ptr_map.get("#/minLength"), Some("#/minLength"));
    }

    #[test]
    fn array_children_get_index_paths() {
        let value = json!(["a", "b"]);
        let overrides = OriginOverrides::new();
        let mut ptr_map = PtrMap::new();
        mirror(&value, "#/enum", &overrides, &mut ptr_map);
        assert_eq!(ptr_map.get("#/enum/0"), Some("#/enum/0"));
        assert_eq!(ptr_map.get("#/enum/1"), Some("#/enum/1"));
    }

    #[test]
    fn override_redirects_origin_for_synthetic_subtree() {
        let value = json!({"patternProperties": {"^(?:a)$": true}});
        let mut overrides = OriginOverrides::new();
        overrides.insert("#/patternProperties", "#/propertyNames");
        let mut ptr_map = PtrMap::new();
        mirror(&value, "#", &overrides, &mut ptr_map);
        assert_eq!(ptr_map.get("#/patternProperties"), Some("#/propertyNames"));
        assert_eq!(
            ptr_map.get("#/patternProperties/^(?:a)$"),
            Some("#/propertyNames/^(?:a)$")
        );
    }

    #[test]
    fn boolean_schema_mirrors_as_value_node() {
        let value = json!(false);
        let overrides = OriginOverrides::new();
        let mut ptr_map = PtrMap::new();
        let root = mirror(&value, "#/additionalProperties", &overrides, &mut ptr_map);
        assert!(root.is_boolean_schema());
    }
}
