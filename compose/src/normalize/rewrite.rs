//! Structural rewrites applied to the raw schema document before it is
//! mirrored into a [`sdgen_kernel::canon::CanonicalNode`] tree (§4.3).

use std::collections::BTreeSet;

use sdgen_kernel::canon::{pointer::push_token, NormalizeNote};
use sdgen_kernel::diag::DiagCode;
use serde_json::{Map, Value};

use crate::error::NormalizeError;

/// Feature flags and guards governing Normalize's rewrites.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Maximum nesting of synthetic `not` introduced by the conditional rewrite.
    pub max_generated_not_nesting: u32,
    /// Enable the pattern-form `propertyNames` rewrite (deferred by default, §9 Open Question 1).
    pub enable_pattern_form_propertynames: bool,
    /// `$ref` targets missing from `$defs` are fatal (`true`) or a warn-note (`false`).
    pub strict_ref_targets: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_generated_not_nesting: 2,
            enable_pattern_form_propertynames: false,
            strict_ref_targets: false,
        }
    }
}

/// Maps a canonical-path prefix to the origin-path prefix its subtree should
/// report, for synthetic structure introduced by a rewrite. Longest-prefix
/// match wins; paths with no matching entry use their own canon path as origin.
#[derive(Debug, Clone, Default)]
pub struct OriginOverrides {
    entries: Vec<(String, String)>,
}

impl OriginOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, canon_prefix: impl Into<String>, origin_prefix: impl Into<String>) {
        self.entries.push((canon_prefix.into(), origin_prefix.into()));
    }

    /// Resolve the origin path for `canon_path`, falling back to identity.
    #[must_use]
    pub fn resolve(&self, canon_path: &str) -> String {
        let mut best: Option<&(String, String)> = None;
        for entry in &self.entries {
            if canon_path == entry.0 || canon_path.starts_with(&format!("{}/", entry.0)) {
                if best.is_none_or(|b| entry.0.len() > b.0.len()) {
                    best = Some(entry);
                }
            }
        }
        match best {
            Some((prefix, origin_prefix)) => {
                format!("{origin_prefix}{}", &canon_path[prefix.len()..])
            }
            None => canon_path.to_string(),
        }
    }
}

pub struct RewriteCtx<'a> {
    pub notes: &'a mut Vec<NormalizeNote>,
    pub overrides: &'a mut OriginOverrides,
    pub options: &'a NormalizeOptions,
    pub defs_index: &'a BTreeSet<String>,
    pub not_nesting_depth: u32,
}

/// Collect every pointer reachable under `#/$defs/*` (after a notional
/// `definitions`→`$defs` merge), for the local `$ref` rewrite's existence check.
#[must_use]
pub fn collect_defs_index(schema: &Value) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let Some(obj) = schema.as_object() else {
        return out;
    };
    for key_name in ["$defs", "definitions"] {
        if let Some(Value::Object(defs)) = obj.get(key_name) {
            for key in defs.keys() {
                out.insert(format!("#/$defs/{}", push_token("", key).trim_start_matches('/')));
            }
        }
    }
    out
}

const SUBSCHEMA_APPLICATOR_KEYS: &[&str] = &[
    "additionalProperties",
    "propertyNames",
    "contains",
    "not",
    "if",
    "then",
    "else",
];
const SUBSCHEMA_MAP_KEYS: &[&str] = &["properties", "patternProperties", "$defs", "dependentSchemas"];
const SUBSCHEMA_ARRAY_KEYS: &[&str] = &["allOf", "anyOf", "oneOf", "prefixItems"];

/// Rewrite `schema` in place to canonical form, recording notes and origin
/// overrides for any synthesized structure.
///
/// # Errors
///
/// Returns [`NormalizeError`] on a hard rewrite-guard violation.
pub fn rewrite_schema(
    schema: &mut Value,
    canon_path: &str,
    origin_path: &str,
    ctx: &mut RewriteCtx,
) -> Result<(), NormalizeError> {
    if schema.is_boolean() {
        return Ok(());
    }
    let Value::Object(_) = schema else {
        return Ok(());
    };

    draft_unify(schema, canon_path, ctx);
    rewrite_local_refs(schema, canon_path, ctx)?;
    mark_dynamic_presence(schema, canon_path, ctx);

    // Recurse into sub-schema positions first (bottom-up: simplification
    // below depends on already-simplified children).
    recurse_children(schema, canon_path, origin_path, ctx)?;

    simplify_boolean_applicators(schema, canon_path, ctx);
    rewrite_conditional(schema, canon_path, ctx)?;
    rewrite_property_names(schema, canon_path, ctx);
    rewrite_dependent_required(schema, canon_path, ctx);

    Ok(())
}

fn recurse_children(
    schema: &mut Value,
    canon_path: &str,
    origin_path: &str,
    ctx: &mut RewriteCtx,
) -> Result<(), NormalizeError> {
    let Value::Object(map) = schema else {
        return Ok(());
    };

    for key in SUBSCHEMA_APPLICATOR_KEYS {
        if let Some(child) = map.get_mut(*key) {
            let child_canon = push_token(canon_path, key);
            let child_origin = push_token(origin_path, key);
            rewrite_schema(child, &child_canon, &child_origin, ctx)?;
        }
    }

    if let Some(Value::Object(children)) = map.get_mut("properties") {
        for (name, child) in children.iter_mut() {
            let child_canon = push_token(&push_token(canon_path, "properties"), name);
            let child_origin = push_token(&push_token(origin_path, "properties"), name);
            rewrite_schema(child, &child_canon, &child_origin, ctx)?;
        }
    }
    if let Some(Value::Object(children)) = map.get_mut("patternProperties") {
        for (name, child) in children.iter_mut() {
            let child_canon = push_token(&push_token(canon_path, "patternProperties"), name);
            let child_origin = push_token(&push_token(origin_path, "patternProperties"), name);
            rewrite_schema(child, &child_canon, &child_origin, ctx)?;
        }
    }
    if let Some(Value::Object(children)) = map.get_mut("$defs") {
        for (name, child) in children.iter_mut() {
            let child_canon = push_token(&push_token(canon_path, "$defs"), name);
            let child_origin = push_token(&push_token(origin_path, "$defs"), name);
            rewrite_schema(child, &child_canon, &child_origin, ctx)?;
        }
    }
    if let Some(Value::Object(children)) = map.get_mut("dependentSchemas") {
        for (name, child) in children.iter_mut() {
            let child_canon = push_token(&push_token(canon_path, "dependentSchemas"), name);
            let child_origin = push_token(&push_token(origin_path, "dependentSchemas"), name);
            rewrite_schema(child, &child_canon, &child_origin, ctx)?;
        }
    }

    for key in SUBSCHEMA_ARRAY_KEYS {
        if let Some(Value::Array(items)) = map.get_mut(*key) {
            for (i, child) in items.iter_mut().enumerate() {
                let child_canon = format!("{canon_path}/{key}/{i}");
                let child_origin = format!("{origin_path}/{key}/{i}");
                rewrite_schema(child, &child_canon, &child_origin, ctx)?;
            }
        }
    }

    if let Some(items) = map.get_mut("items") {
        if !items.is_array() {
            let child_canon = push_token(canon_path, "items");
            let child_origin = push_token(origin_path, "items");
            rewrite_schema(items, &child_canon, &child_origin, ctx)?;
        }
    }

    let _ = SUBSCHEMA_MAP_KEYS;
    Ok(())
}

fn draft_unify(schema: &mut Value, canon_path: &str, ctx: &mut RewriteCtx) {
    let Value::Object(map) = schema else { return };

    if let Some(id_value) = map.remove("id") {
        map.entry("$id").or_insert(id_value);
    }

    if let Some(Value::Object(old_defs)) = map.remove("definitions") {
        match map.entry("$defs") {
            serde_json::map::Entry::Occupied(mut existing) => {
                if let Value::Object(defs) = existing.get_mut() {
                    for (k, v) in old_defs {
                        defs.entry(k).or_insert(v);
                    }
                }
            }
            serde_json::map::Entry::Vacant(slot) => {
                slot.insert(Value::Object(old_defs));
            }
        }
    }

    if let Some(Value::Array(_)) = map.get("items") {
        let items = map.remove("items").unwrap();
        let additional = map.remove("additionalItems");
        map.insert("prefixItems".to_string(), items);
        if let Some(additional) = additional {
            map.insert("items".to_string(), additional);
        }
    }

    if let Some(Value::Bool(true)) = map.get("nullable") {
        map.remove("nullable");
        match map.get_mut("type") {
            Some(Value::String(t)) => {
                let existing = t.clone();
                map.insert("type".into(), serde_json::json!([existing, "null"]));
            }
            Some(Value::Array(types)) => {
                if !types.iter().any(|t| t == "null") {
                    types.push(Value::String("null".into()));
                }
            }
            _ => {
                map.insert("type".into(), serde_json::json!("null"));
            }
        }
    } else {
        map.remove("nullable");
    }

    fold_exclusive_bound(map, "exclusiveMinimum", "minimum", canon_path, ctx.notes);
    fold_exclusive_bound(map, "exclusiveMaximum", "maximum", canon_path, ctx.notes);
}

fn fold_exclusive_bound(
    map: &mut Map<String, Value>,
    exclusive_key: &str,
    base_key: &str,
    canon_path: &str,
    notes: &mut Vec<NormalizeNote>,
) {
    if let Some(Value::Bool(is_exclusive)) = map.get(exclusive_key).cloned() {
        map.remove(exclusive_key);
        if is_exclusive {
            if let Some(base) = map.remove(base_key) {
                map.insert(exclusive_key.to_string(), base);
            } else {
                notes.push(NormalizeNote::with_details(
                    canon_path.to_string(),
                    "EXCLUSIVE_BOUND_BASE_MISSING".to_string(),
                    serde_json::json!({ "keyword": exclusive_key }),
                ));
            }
        }
    }
}

fn rewrite_local_refs(
    schema: &mut Value,
    canon_path: &str,
    ctx: &mut RewriteCtx,
) -> Result<(), NormalizeError> {
    let Value::Object(map) = schema else { return Ok(()) };
    let Some(Value::String(reference)) = map.get("$ref") else {
        return Ok(());
    };
    if let Some(suffix) = reference.strip_prefix("#/definitions/") {
        let rewritten = format!("#/$defs/{suffix}");
        if ctx.defs_index.contains(&rewritten) {
            map.insert("$ref".to_string(), Value::String(rewritten));
        } else if ctx.options.strict_ref_targets {
            return Err(NormalizeError::DefsTargetMissing {
                canon_path: canon_path.to_string(),
                target: rewritten,
            });
        } else {
            ctx.notes.push(NormalizeNote::with_details(
                canon_path.to_string(),
                DiagCode::DefsTargetMissing.as_str().to_string(),
                serde_json::json!({ "target": rewritten }),
            ));
        }
    }
    Ok(())
}

fn mark_dynamic_presence(schema: &Value, canon_path: &str, ctx: &mut RewriteCtx) {
    let Value::Object(map) = schema else { return };
    if map.contains_key("$dynamicRef")
        || map.contains_key("$dynamicAnchor")
        || map.contains_key("$recursiveRef")
    {
        ctx.notes.push(NormalizeNote::new(
            canon_path.to_string(),
            DiagCode::DynamicPresent.as_str().to_string(),
        ));
    }
}

fn has_unevaluated_in_scope(map: &Map<String, Value>) -> bool {
    map.contains_key("unevaluatedProperties") || map.contains_key("unevaluatedItems")
}

fn simplify_boolean_applicators(schema: &mut Value, canon_path: &str, ctx: &mut RewriteCtx) {
    let Value::Object(map) = schema else { return };
    if has_unevaluated_in_scope(map) {
        for (key, code) in [
            ("allOf", DiagCode::AllofSimplificationSkippedUnevaluated),
            ("anyOf", DiagCode::AnyofSimplificationSkippedUnevaluated),
            ("oneOf", DiagCode::OneofSimplificationSkippedUnevaluated),
        ] {
            if map.contains_key(key) {
                ctx.notes.push(NormalizeNote::with_details(
                    canon_path.to_string(),
                    code.as_str().to_string(),
                    serde_json::json!({ "reason": "unevaluatedInScope" }),
                ));
            }
        }
        return;
    }

    if let Some(Value::Array(items)) = map.get("allOf") {
        if items.is_empty() {
            map.remove("allOf");
        } else if items.iter().any(|v| v == &Value::Bool(false)) {
            *schema = Value::Bool(false);
            return;
        }
    }

    let Value::Object(map) = schema else { return };
    if let Some(Value::Array(items)) = map.get("anyOf") {
        if items.is_empty() {
            *schema = Value::Bool(false);
            return;
        }
        if items.iter().any(|v| v == &Value::Bool(true)) {
            map.remove("anyOf");
        }
    }

    let Value::Object(map) = schema else { return };
    if let Some(Value::Array(items)) = map.get("oneOf").cloned().as_ref() {
        if items.is_empty() {
            *schema = Value::Bool(false);
            return;
        }
        if items.iter().any(|v| v == &Value::Bool(true)) {
            map.remove("oneOf");
        } else if items.len() == 1 {
            let only = items[0].clone();
            map.remove("oneOf");
            if map.is_empty() {
                *schema = only;
            } else {
                let all_of = map.entry("allOf").or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(arr) = all_of {
                    arr.push(only);
                }
            }
        }
    }
}

fn rewrite_conditional(
    schema: &mut Value,
    canon_path: &str,
    ctx: &mut RewriteCtx,
) -> Result<(), NormalizeError> {
    let Value::Object(map) = schema else { return Ok(()) };
    if !map.contains_key("if") {
        return Ok(());
    }

    let blocking = map.contains_key("unevaluatedProperties")
        || map.contains_key("unevaluatedItems")
        || has_unevaluated_in_scope(map);

    if blocking {
        ctx.notes.push(NormalizeNote::with_details(
            canon_path.to_string(),
            DiagCode::ConditionalRewriteSkippedBlocked.as_str().to_string(),
            serde_json::json!({ "reason": "unevaluatedInScope" }),
        ));
        return Ok(());
    }

    if ctx.not_nesting_depth + 1 > ctx.options.max_generated_not_nesting {
        return Err(NormalizeError::NotNestingBudgetExceeded {
            canon_path: canon_path.to_string(),
            limit: ctx.options.max_generated_not_nesting,
        });
    }

    let if_schema = map.remove("if").unwrap();
    let then_schema = map.remove("then").unwrap_or(Value::Bool(true));
    let else_schema = map.remove("else").unwrap_or(Value::Bool(true));

    // if/then/else -> anyOf[allOf[not(not S), T], allOf[not S, E]]
    let branch_true = serde_json::json!({
        "allOf": [{"allOf": [{"not": {"not": if_schema.clone()}}]}, then_schema]
    });
    let branch_false = serde_json::json!({
        "allOf": [{"not": if_schema}, else_schema]
    });
    map.insert(
        "anyOf".to_string(),
        Value::Array(vec![branch_true, branch_false]),
    );
    Ok(())
}

fn rewrite_property_names(schema: &mut Value, canon_path: &str, ctx: &mut RewriteCtx) {
    let Value::Object(map) = schema else { return };
    let Some(property_names) = map.get("propertyNames").cloned() else {
        return;
    };
    let Value::Object(pn) = &property_names else {
        return;
    };
    let Some(Value::Array(enum_values)) = pn.get("enum") else {
        if pn.contains_key("pattern") && !ctx.options.enable_pattern_form_propertynames {
            ctx.notes.push(NormalizeNote::with_details(
                canon_path.to_string(),
                DiagCode::PnamesComplex.as_str().to_string(),
                serde_json::json!({ "reason": "patternFormDisabled" }),
            ));
        }
        return;
    };

    let mut names: Vec<String> = Vec::new();
    for v in enum_values {
        match v.as_str() {
            Some(s) => names.push(s.to_string()),
            None => {
                ctx.notes.push(NormalizeNote::with_details(
                    canon_path.to_string(),
                    DiagCode::PnamesComplex.as_str().to_string(),
                    serde_json::json!({ "reason": "nonStringEnumMember" }),
                ));
                return;
            }
        }
    }
    names.sort();
    names.dedup();

    if let Some(Value::Array(required)) = map.get("required") {
        for req in required {
            if let Some(req_name) = req.as_str() {
                if !names.iter().any(|n| n == req_name) {
                    ctx.notes.push(NormalizeNote::with_details(
                        canon_path.to_string(),
                        DiagCode::PnamesComplex.as_str().to_string(),
                        serde_json::json!({ "reason": "requiredKeyOutsideEnum", "key": req_name }),
                    ));
                    return;
                }
            }
        }
    }

    let alternation = names
        .iter()
        .map(|n| regex_escape(n))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!("^(?:{alternation})$");

    map.insert(
        "patternProperties".to_string(),
        serde_json::json!({ pattern: true }),
    );
    map.insert("additionalProperties".to_string(), Value::Bool(false));

    let pnames_canon = push_token(canon_path, "propertyNames");
    ctx.overrides
        .insert(push_token(canon_path, "patternProperties"), pnames_canon.clone());
    ctx.overrides
        .insert(push_token(canon_path, "additionalProperties"), pnames_canon.clone());

    ctx.notes.push(NormalizeNote::with_details(
        canon_path.to_string(),
        DiagCode::PnamesRewriteApplied.as_str().to_string(),
        serde_json::json!({ "names": names }),
    ));
}

fn regex_escape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        if ".*+?[]{}()^$|\\".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn rewrite_dependent_required(schema: &mut Value, canon_path: &str, ctx: &mut RewriteCtx) {
    let Value::Object(map) = schema else { return };
    if has_unevaluated_in_scope(map) {
        return;
    }
    let Some(Value::Object(dependent)) = map.remove("dependentRequired") else {
        return;
    };

    let mut guards: Vec<Value> = Vec::new();
    for (key, deps) in &dependent {
        let Value::Array(deps) = deps else { continue };
        let mut required_all = vec![Value::String(key.clone())];
        required_all.extend(deps.iter().cloned());
        guards.push(serde_json::json!({
            "anyOf": [
                {"not": {"required": [key]}},
                {"required": required_all}
            ]
        }));
    }

    if guards.is_empty() {
        return;
    }

    let all_of = map.entry("allOf").or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(arr) = all_of {
        arr.extend(guards);
    }
    let _ = canon_path;
    let _ = ctx;
}
