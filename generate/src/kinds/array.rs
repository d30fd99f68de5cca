//! Array generation: `prefixItems` positions, contains-bag witnesses, a
//! stable filler value, and `uniqueItems` dedup by canonical JSON (§4.5
//! "Arrays").

use sdgen_kernel::canon::{pointer::push_index, CanonicalNode, ObjectEntries};
use sdgen_kernel::diag::DiagnosticEnvelope;
use sdgen_kernel::hash::canonical_json_bytes;
use serde_json::Value;

use crate::error::ItemOutcome;
use crate::kinds::{generate_node, resolve_path, CallCounters, GenCtx};

fn entries_of(node: &CanonicalNode) -> Option<&ObjectEntries> {
    match node {
        CanonicalNode::Object { entries, .. } => Some(entries),
        _ => None,
    }
}

fn as_u64(node: Option<&CanonicalNode>) -> Option<u64> {
    node.and_then(CanonicalNode::as_schema_value).and_then(Value::as_u64)
}

fn as_bool(node: Option<&CanonicalNode>) -> Option<bool> {
    node.and_then(CanonicalNode::as_schema_value).and_then(Value::as_bool)
}

/// The stable filler value used once `prefixItems`/contains witnesses are
/// placed and `minItems` still requires more elements: `false`, chosen
/// ahead of `0`/`""`/`{}`/`[]` as the cheapest value that is valid under an
/// untyped `items` schema (§4.5).
fn filler_value() -> Value {
    Value::Bool(false)
}

fn canonical_key(value: &Value) -> Vec<u8> {
    canonical_json_bytes(value).unwrap_or_default()
}

/// Generate an array value from `node` (§4.5 "Arrays").
pub fn generate_array(
    node: &CanonicalNode,
    canon_path: &str,
    ctx: &GenCtx,
    diag: &mut DiagnosticEnvelope,
    counters: &mut CallCounters,
) -> ItemOutcome {
    if ctx.options.prefer_examples {
        if let Some(entries) = entries_of(node) {
            if let Some(v) = entries.get("example").and_then(CanonicalNode::as_schema_value) {
                return Ok(v.clone());
            }
        }
    }

    let Some(entries) = entries_of(node) else {
        return Ok(Value::Array(Vec::new()));
    };

    let min_items = as_u64(entries.get("minItems")).unwrap_or(0);
    let max_items = as_u64(entries.get("maxItems"));
    let unique_items = as_bool(entries.get("uniqueItems")).unwrap_or(false);

    let mut items = Vec::new();
    let mut seen: Vec<Vec<u8>> = Vec::new();

    if let Some(CanonicalNode::Array { children, .. }) = entries.get("prefixItems") {
        for (i, child) in children.iter().enumerate() {
            let child_path = push_index(&sdgen_kernel::canon::pointer::push_token(canon_path, "prefixItems"), i);
            let value = generate_node(child, &child_path, ctx, diag, counters)?;
            if unique_items {
                let key = canonical_key(&value);
                if seen.contains(&key) {
                    continue;
                }
                seen.push(key);
            }
            items.push(value);
        }
    }

    if let Some(bag) = ctx.plan.contains.get(canon_path) {
        for need in &bag.needs {
            let Some(schema) = resolve_path(&ctx.plan.root, &need.canon_path) else {
                continue;
            };
            let want = need.min.max(1);
            let mut placed = 0u64;
            let mut attempts = 0u64;
            while placed < want && attempts < want.saturating_mul(4).max(8) {
                attempts += 1;
                let child_path = format!("{}/{placed}", need.canon_path);
                let value = generate_node(schema, &child_path, ctx, diag, counters)?;
                if unique_items {
                    let key = canonical_key(&value);
                    if seen.contains(&key) {
                        continue;
                    }
                    seen.push(key);
                }
                items.push(value);
                placed += 1;
                if let Some(max) = max_items {
                    if items.len() as u64 >= max {
                        break;
                    }
                }
            }
        }
    }

    let items_schema = entries.get("items");
    while (items.len() as u64) < min_items {
        if let Some(max) = max_items {
            if items.len() as u64 >= max {
                break;
            }
        }
        let value = if let Some(schema) = items_schema {
            let child_path = sdgen_kernel::canon::pointer::push_token(canon_path, "items");
            generate_node(schema, &child_path, ctx, diag, counters)?
        } else {
            filler_value()
        };
        if unique_items {
            let key = canonical_key(&value);
            if seen.contains(&key) {
                // Stable filler can't be repeated under uniqueItems; stop
                // rather than loop forever once the witness domain runs dry.
                break;
            }
            seen.push(key);
        }
        items.push(value);
    }

    Ok(Value::Array(items))
}
