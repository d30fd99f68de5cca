//! Per-node value generation, split by JSON Schema instance kind (§4.5).

pub mod array;
pub mod format_registry;
pub mod object;
pub mod scalar;

use std::collections::HashMap;

use sdgen_compose::plan::{ComposePlan, RationalOptions};

use crate::runner::GenerateOptions;

/// Monotonic per-path counters, used to give format-registry and
/// pattern-witness draws a unique-per-call suffix even when the same node
/// is visited repeatedly (array filler, `count` > 1).
pub type CallCounters = HashMap<String, u64>;

/// Bump and return the counter for `canon_path`.
pub fn next_call_index(counters: &mut CallCounters, canon_path: &str) -> u64 {
    let entry = counters.entry(canon_path.to_string()).or_insert(0);
    let value = *entry;
    *entry += 1;
    value
}

/// Shared, read-only context threaded through every `generate_*` call.
pub struct GenCtx<'a> {
    pub plan: &'a ComposePlan,
    pub options: &'a GenerateOptions<'a>,
}

impl<'a> GenCtx<'a> {
    #[must_use]
    pub fn rational(&self) -> &RationalOptions {
        &self.options.rational
    }
}

/// Walk `root` to the node at `canon_path` (a `#/...` JSON Pointer built
/// from the same tokens the canonical tree was mirrored with). Used to
/// recover a `contains`/`allOf` requirement's schema node from the path
/// recorded in a [`sdgen_compose::contains::ContainsNeed`].
#[must_use]
pub fn resolve_path<'a>(root: &'a sdgen_kernel::canon::CanonicalNode, canon_path: &str) -> Option<&'a sdgen_kernel::canon::CanonicalNode> {
    let mut node = root;
    let rest = canon_path.strip_prefix('#')?;
    if rest.is_empty() {
        return Some(node);
    }
    for raw_token in rest.trim_start_matches('/').split('/') {
        let token = raw_token.replace("~1", "/").replace("~0", "~");
        node = match node {
            sdgen_kernel::canon::CanonicalNode::Object { entries, .. } => entries.get(&token)?,
            sdgen_kernel::canon::CanonicalNode::Array { children, .. } => {
                children.get(token.parse::<usize>().ok()?)?
            }
            sdgen_kernel::canon::CanonicalNode::Value { .. } => return None,
        };
    }
    Some(node)
}

fn entries_of(node: &sdgen_kernel::canon::CanonicalNode) -> Option<&sdgen_kernel::canon::ObjectEntries> {
    match node {
        sdgen_kernel::canon::CanonicalNode::Object { entries, .. } => Some(entries),
        _ => None,
    }
}

fn has_any(entries: &sdgen_kernel::canon::ObjectEntries, keys: &[&str]) -> bool {
    keys.iter().any(|k| entries.contains_key(k))
}

/// Dispatch a single node to the object/array/scalar generator, by
/// inspecting which structural keywords it carries (§4.5).
///
/// `anyOf`/`oneOf` are resolved here by reading back the branch decision
/// Compose already recorded, never by re-scoring.
pub fn generate_node(
    node: &sdgen_kernel::canon::CanonicalNode,
    canon_path: &str,
    ctx: &GenCtx,
    diag: &mut sdgen_kernel::diag::DiagnosticEnvelope,
    counters: &mut CallCounters,
) -> crate::error::ItemOutcome {
    use sdgen_kernel::canon::pointer::push_token;

    if let Some(entries) = entries_of(node) {
        for (key, kind) in [("oneOf", sdgen_kernel::diag::BranchKind::OneOf), ("anyOf", sdgen_kernel::diag::BranchKind::AnyOf)] {
            if let Some(sdgen_kernel::canon::CanonicalNode::Array { children, .. }) = entries.get(key) {
                let branch_path = push_token(canon_path, key);
                let decision = ctx
                    .plan
                    .diag
                    .branch_decisions
                    .iter()
                    .find(|d| d.canon_path == branch_path && d.kind == kind);
                let chosen = decision.map_or(0, |d| d.chosen_index).min(children.len().saturating_sub(1));
                let child = &children[chosen];
                let child_path = format!("{branch_path}/{chosen}");
                let value = generate_node(child, &child_path, ctx, diag, counters)?;
                if kind == sdgen_kernel::diag::BranchKind::OneOf {
                    return crate::exclusivity::enforce_one_of_exclusivity(
                        value, node, children, chosen, canon_path, ctx, diag, counters,
                    );
                }
                return Ok(value);
            }
        }

        if has_any(entries, &["properties", "patternProperties", "required", "propertyNames", "additionalProperties"])
            || matches!(entries.get("type").and_then(sdgen_kernel::canon::CanonicalNode::as_schema_value), Some(serde_json::Value::String(t)) if t == "object")
        {
            return crate::kinds::object::generate_object(node, canon_path, ctx, diag, counters);
        }

        if has_any(entries, &["items", "prefixItems", "contains"])
            || matches!(entries.get("type").and_then(sdgen_kernel::canon::CanonicalNode::as_schema_value), Some(serde_json::Value::String(t)) if t == "array")
        {
            return crate::kinds::array::generate_array(node, canon_path, ctx, diag, counters);
        }
    }

    crate::kinds::scalar::generate_scalar(node, canon_path, ctx, diag, counters)
}
