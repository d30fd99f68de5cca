//! Scalar (boolean/number/integer/string) generation: `const > enum > format
//! > numeric/string constraints > type default` (§4.5 "Primitive precedence").

use sdgen_kernel::canon::CanonicalNode;
use sdgen_kernel::diag::{DiagCode, DiagEntry, DiagnosticEnvelope, Phase};
use sdgen_kernel::rng::XorShift32;
use serde_json::Value;

use crate::error::{ItemFailure, ItemOutcome};
use crate::kinds::{format_registry, next_call_index, CallCounters, GenCtx};
use crate::rational::{align_up_to_step, combine_multiple_of, exclusive_epsilon};

fn entries_of(node: &CanonicalNode) -> Option<&sdgen_kernel::canon::ObjectEntries> {
    match node {
        CanonicalNode::Object { entries, .. } => Some(entries),
        _ => None,
    }
}

fn node_str<'a>(node: Option<&'a CanonicalNode>) -> Option<&'a str> {
    node.and_then(CanonicalNode::as_schema_value).and_then(Value::as_str)
}

fn node_f64(node: Option<&CanonicalNode>) -> Option<f64> {
    node.and_then(CanonicalNode::as_schema_value).and_then(Value::as_f64)
}

fn node_bool_value(node: Option<&CanonicalNode>) -> Option<bool> {
    node.and_then(CanonicalNode::as_schema_value).and_then(Value::as_bool)
}

fn own_type(entries: &sdgen_kernel::canon::ObjectEntries) -> Option<String> {
    match entries.get("type").and_then(CanonicalNode::as_schema_value) {
        Some(Value::String(t)) => Some(t.clone()),
        Some(Value::Array(types)) => types.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn example_value(entries: &sdgen_kernel::canon::ObjectEntries) -> Option<Value> {
    if let Some(v) = entries.get("example").and_then(CanonicalNode::as_schema_value) {
        return Some(v.clone());
    }
    if let Some(CanonicalNode::Array { children, .. }) = entries.get("examples") {
        return children.first().and_then(CanonicalNode::as_schema_value).cloned();
    }
    None
}

/// Collect `multipleOf`/bound keywords from `node`'s own conjunct plus each
/// direct `allOf` branch (shallow, matching the contains/coverage walk).
#[derive(Debug, Default)]
struct NumericConstraints {
    minimum: Option<f64>,
    exclusive_minimum: Option<f64>,
    maximum: Option<f64>,
    exclusive_maximum: Option<f64>,
    multiple_of_steps: Vec<f64>,
}

fn merge_numeric_conjunct(entries: &sdgen_kernel::canon::ObjectEntries, acc: &mut NumericConstraints) {
    if let Some(v) = node_f64(entries.get("minimum")) {
        acc.minimum = Some(acc.minimum.map_or(v, |cur| cur.max(v)));
    }
    if let Some(v) = node_f64(entries.get("exclusiveMinimum")) {
        acc.exclusive_minimum = Some(acc.exclusive_minimum.map_or(v, |cur| cur.max(v)));
    }
    if let Some(v) = node_f64(entries.get("maximum")) {
        acc.maximum = Some(acc.maximum.map_or(v, |cur| cur.min(v)));
    }
    if let Some(v) = node_f64(entries.get("exclusiveMaximum")) {
        acc.exclusive_maximum = Some(acc.exclusive_maximum.map_or(v, |cur| cur.min(v)));
    }
    if let Some(v) = node_f64(entries.get("multipleOf")) {
        acc.multiple_of_steps.push(v);
    }
}

fn numeric_constraints(node: &CanonicalNode) -> NumericConstraints {
    let mut acc = NumericConstraints::default();
    let Some(entries) = entries_of(node) else { return acc };
    merge_numeric_conjunct(entries, &mut acc);
    if let Some(CanonicalNode::Array { children, .. }) = entries.get("allOf") {
        for child in children {
            if let Some(child_entries) = entries_of(child) {
                merge_numeric_conjunct(child_entries, &mut acc);
            }
        }
    }
    acc
}

fn generate_number(node: &CanonicalNode, canon_path: &str, ctx: &GenCtx, is_integer: bool) -> f64 {
    let c = numeric_constraints(node);
    let precision = ctx.rational().decimal_precision;

    let mut lower = c.minimum.unwrap_or(0.0);
    if let Some(exc) = c.exclusive_minimum {
        let candidate = exc + exclusive_epsilon(exc, precision);
        lower = lower.max(candidate);
    }

    let step = combine_multiple_of(&c.multiple_of_steps, precision);
    let mut value = if let Some(step) = step {
        align_up_to_step(lower, step)
    } else {
        lower
    };

    if let Some(exc_max) = c.exclusive_maximum {
        if value >= exc_max {
            value = exc_max - exclusive_epsilon(exc_max, precision);
        }
    }
    if let Some(max) = c.maximum {
        if value > max {
            value = max;
        }
    }

    if is_integer {
        value = value.round();
    }
    let _ = canon_path;
    value
}

fn code_points(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn enforce_string_length(mut s: String, node: &CanonicalNode) -> String {
    let Some(entries) = entries_of(node) else { return s };
    let min_length = node_f64(entries.get("minLength")).map(|v| v as usize);
    let max_length = node_f64(entries.get("maxLength")).map(|v| v as usize);

    if let Some(max_length) = max_length {
        let chars = code_points(&s);
        if chars.len() > max_length {
            s = chars.into_iter().take(max_length).collect();
        }
    }
    if let Some(min_length) = min_length {
        let mut chars = code_points(&s);
        while chars.len() < min_length {
            chars.push('a');
        }
        s = chars.into_iter().collect();
    }
    s
}

/// Generate a value for a scalar (non-object, non-array) node, or fall
/// through to [`crate::kinds::object`]/[`crate::kinds::array`] callers for
/// those two kinds -- this module only handles `boolean`/`integer`/`number`/
/// `string`/untyped leaf nodes.
pub fn generate_scalar(
    node: &CanonicalNode,
    canon_path: &str,
    ctx: &GenCtx,
    diag: &mut DiagnosticEnvelope,
    counters: &mut CallCounters,
) -> ItemOutcome {
    if let Some(v) = node.as_schema_value().and_then(Value::as_bool) {
        if !v {
            return Err(ItemFailure::with_reason("unsatisfiable", "schema is the literal `false`"));
        }
        return Ok(Value::Null);
    }

    let Some(entries) = entries_of(node) else {
        return Ok(Value::Null);
    };

    if ctx.options.prefer_examples {
        if let Some(example) = example_value(entries) {
            return Ok(example);
        }
    }

    if let Some(v) = entries.get("const").and_then(CanonicalNode::as_schema_value) {
        return Ok(v.clone());
    }

    if let Some(CanonicalNode::Array { children, .. }) = entries.get("enum") {
        if let Some(first) = children.first().and_then(CanonicalNode::as_schema_value) {
            return Ok(first.clone());
        }
    }

    let singleton_type = own_type(entries).or_else(|| {
        if let Some(CanonicalNode::Array { children, .. }) = entries.get("allOf") {
            children.iter().find_map(|child| entries_of(child).and_then(own_type))
        } else {
            None
        }
    });

    match singleton_type.as_deref() {
        Some("boolean") => Ok(Value::Bool(false)),
        Some("integer") => Ok(serde_json::json!(generate_number(node, canon_path, ctx, true) as i64)),
        Some("number") => Ok(serde_json::json!(generate_number(node, canon_path, ctx, false))),
        Some("string") | None => generate_string(entries, node, canon_path, ctx, diag, counters),
        Some("null") => Ok(Value::Null),
        _ => Ok(Value::Null),
    }
}

fn generate_string(
    entries: &sdgen_kernel::canon::ObjectEntries,
    node: &CanonicalNode,
    canon_path: &str,
    ctx: &GenCtx,
    diag: &mut DiagnosticEnvelope,
    counters: &mut CallCounters,
) -> ItemOutcome {
    if let Some(format) = node_str(entries.get("format")) {
        if !ctx.options.validate_formats {
            return Ok(Value::String(String::new()));
        }
        let call_index = next_call_index(counters, canon_path);
        let mut rng = XorShift32::seeded(ctx.options.global_seed, canon_path);
        return match format_registry::generate(format, &mut rng, call_index) {
            Some(value) => Ok(Value::String(enforce_string_length(value, node))),
            None => {
                diag.push_warn(
                    DiagEntry::with_details(
                        DiagCode::ValidationSkipped,
                        canon_path.to_string(),
                        serde_json::json!({ "format": format, "reason": "unsupportedFormat" }),
                    ),
                    Phase::Generate,
                );
                Err(ItemFailure::unsupported_format(format))
            }
        };
    }

    let ap_object = matches!(node_bool_value(entries.get("additionalProperties")), Some(true));
    let _ = ap_object;
    Ok(Value::String(enforce_string_length(String::new(), node)))
}
