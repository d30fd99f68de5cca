//! Object generation: `required` keys, coverage-index-driven additional
//! keys, and a bounded pattern-witness search under `additionalProperties:
//! false` (§4.5 "Objects").

use std::collections::BTreeSet;

use sdgen_kernel::canon::{pointer::push_token, CanonicalNode, ObjectEntries};
use sdgen_kernel::diag::{DiagCode, DiagEntry, DiagnosticEnvelope, Phase};
use sdgen_kernel::rng::XorShift32;
use serde_json::{Map, Value};

use crate::error::ItemOutcome;
use crate::kinds::{generate_node, next_call_index, CallCounters, GenCtx};

fn entries_of(node: &CanonicalNode) -> Option<&ObjectEntries> {
    match node {
        CanonicalNode::Object { entries, .. } => Some(entries),
        _ => None,
    }
}

fn required_keys(entries: &ObjectEntries) -> Vec<String> {
    match entries.get("required") {
        Some(CanonicalNode::Array { children, .. }) => children
            .iter()
            .filter_map(CanonicalNode::as_schema_value)
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn property_schema<'a>(entries: &'a ObjectEntries, key: &str) -> Option<&'a CanonicalNode> {
    if let Some(CanonicalNode::Object { entries: props, .. }) = entries.get("properties") {
        if let Some(node) = props.get(key) {
            return Some(node);
        }
    }
    None
}

/// Find the first `patternProperties` entry whose source matches `key`,
/// returning its schema node and source pattern.
fn matching_pattern_schema<'a>(entries: &'a ObjectEntries, key: &str) -> Option<(&'a CanonicalNode, &'a str)> {
    let CanonicalNode::Object { entries: patterns, .. } = entries.get("patternProperties")? else {
        return None;
    };
    for (source, schema) in patterns.iter() {
        if let Ok(re) = regex::Regex::new(source) {
            if re.is_match(key) {
                return Some((schema, source));
            }
        }
    }
    None
}

const PATTERN_WITNESS_ALPHABET_DEFAULT: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Safety bound on the number of additional-key picks attempted to satisfy
/// `minProperties`, so an object whose coverage/pattern-witness search never
/// truly exhausts (e.g. an unbounded pattern alphabet) cannot loop forever.
const MAX_ADDITIONAL_KEY_ATTEMPTS: usize = 4096;

fn min_properties(entries: &ObjectEntries) -> usize {
    entries
        .get("minProperties")
        .and_then(CanonicalNode::as_schema_value)
        .and_then(Value::as_u64)
        .map_or(0, |v| usize::try_from(v).unwrap_or(usize::MAX))
}

/// Search for a string matching `pattern` within the configured candidate
/// budget. Deterministic: candidates are drawn in increasing length from a
/// fixed alphabet, seeded from `canon_path`.
fn find_pattern_witness(
    pattern: &str,
    canon_path: &str,
    ctx: &GenCtx,
    diag: &mut DiagnosticEnvelope,
) -> Option<String> {
    let re = regex::Regex::new(pattern).ok()?;
    let alphabet: Vec<char> = if ctx.options.pattern_witness.alphabet.is_empty() {
        PATTERN_WITNESS_ALPHABET_DEFAULT.chars().collect()
    } else {
        ctx.options.pattern_witness.alphabet.chars().collect()
    };
    let max_length = ctx.options.pattern_witness.max_length.max(1);
    let max_candidates = ctx.options.pattern_witness.max_candidates.max(1);

    let mut rng = XorShift32::seeded(ctx.options.global_seed, canon_path);
    let mut tried = 0usize;
    for length in 1..=max_length {
        for _ in 0..max_candidates {
            if tried >= max_candidates {
                diag.push_warn(
                    DiagEntry::with_details(
                        DiagCode::ComplexityCapPatterns,
                        canon_path.to_string(),
                        serde_json::json!({ "reason": "candidateBudget" }),
                    ),
                    Phase::Generate,
                );
                return None;
            }
            tried += 1;
            diag.metrics.pattern_witness_tried += 1;
            let candidate: String = (0..length).map(|_| alphabet[rng.next_index(alphabet.len())]).collect();
            if re.is_match(&candidate) {
                return Some(candidate);
            }
        }
    }
    diag.push_warn(
        DiagEntry::with_details(
            DiagCode::ComplexityCapPatterns,
            canon_path.to_string(),
            serde_json::json!({ "reason": "witnessDomainExhausted" }),
        ),
        Phase::Generate,
    );
    None
}

/// Pick one additional property name not already in `excluded`, from the
/// coverage index when an `additionalProperties:false` entry is on record,
/// falling back to a bounded pattern-witness search when enumeration is
/// blocked by an unsafe `patternProperties` key. `attempt` varies the
/// pattern-witness seed so repeated calls (looping to satisfy
/// `minProperties`) don't just rediscover the same witness.
fn pick_additional_key(
    entries: &ObjectEntries,
    canon_path: &str,
    excluded: &BTreeSet<String>,
    attempt: usize,
    ctx: &GenCtx,
    diag: &mut DiagnosticEnvelope,
) -> Option<String> {
    if let Some(coverage) = ctx.plan.coverage.get(canon_path) {
        if let Some(names) = coverage.enumerate() {
            return names.into_iter().find(|n| !excluded.contains(n));
        }
        if coverage.has_unsafe_pattern() {
            if let Some(CanonicalNode::Object { entries: patterns, .. }) = entries.get("patternProperties") {
                for (source, _) in patterns.iter() {
                    let witness_path = format!("{}#{attempt}", push_token(canon_path, "patternProperties"));
                    if let Some(witness) = find_pattern_witness(source, &witness_path, ctx, diag) {
                        if !excluded.contains(&witness) {
                            return Some(witness);
                        }
                    }
                }
            }
        }
        return None;
    }

    // No `additionalProperties:false` on record: properties not named in
    // `excluded` are still safe to surface if declared.
    if let Some(CanonicalNode::Object { entries: props, .. }) = entries.get("properties") {
        for key in props.keys() {
            if !excluded.contains(key) {
                return Some(key.clone());
            }
        }
    }
    None
}

fn schema_for_key<'a>(entries: &'a ObjectEntries, key: &str) -> Option<(&'a CanonicalNode, String)> {
    if let Some(node) = property_schema(entries, key) {
        return Some((node, "properties".to_string()));
    }
    matching_pattern_schema(entries, key).map(|(node, _)| (node, "patternProperties".to_string()))
}

/// Generate an object value from `node` (§4.5 "Objects").
pub fn generate_object(
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
        return Ok(Value::Object(Map::new()));
    };

    let required = required_keys(entries);
    let mut map = Map::new();

    for key in &required {
        let child_path;
        let child = if let Some(schema) = property_schema(entries, key) {
            child_path = push_token(&push_token(canon_path, "properties"), key);
            schema
        } else if let Some((schema, _)) = matching_pattern_schema(entries, key) {
            child_path = push_token(&push_token(canon_path, "patternProperties"), key);
            schema
        } else {
            // No declared schema: any value satisfies an untyped property.
            map.insert(key.clone(), Value::Null);
            let _ = next_call_index(counters, canon_path);
            continue;
        };
        let value = generate_node(child, &child_path, ctx, diag, counters)?;
        map.insert(key.clone(), value);
    }

    // Coverage-index-driven additional keys beyond `required`: at least one
    // enrichment pick when something is available, and as many more as
    // needed to satisfy `minProperties`, bounded by coverage/pattern-witness
    // exhaustion (`pick_additional_key` returning `None`).
    let min_props = min_properties(entries);
    let mut excluded: BTreeSet<String> = required.iter().cloned().collect();
    let mut attempt = 0usize;
    let mut enriched_once = false;
    while attempt < MAX_ADDITIONAL_KEY_ATTEMPTS && (map.len() < min_props || !enriched_once) {
        let Some(extra_key) = pick_additional_key(entries, canon_path, &excluded, attempt, ctx, diag) else {
            break;
        };
        excluded.insert(extra_key.clone());
        enriched_once = true;
        attempt += 1;
        if let Some((schema, group)) = schema_for_key(entries, &extra_key) {
            let child_path = push_token(&push_token(canon_path, &group), &extra_key);
            let value = generate_node(schema, &child_path, ctx, diag, counters)?;
            map.insert(extra_key, value);
        } else {
            map.insert(extra_key, Value::String(String::new()));
        }
    }

    Ok(Value::Object(map))
}
