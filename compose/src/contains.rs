//! Contains bag: aggregated `contains`/`minContains`/`maxContains` needs for
//! an array-like node, with unsat-by-sum and disjointness analysis (§4.4).

use sdgen_kernel::canon::CanonicalNode;
use sdgen_kernel::diag::{DiagCode, DiagEntry, DiagnosticEnvelope, Phase, UnsatHint};
use serde_json::Value;

/// Default cap on the number of distinct contains needs aggregated per node.
pub const CONTAINS_BAG_CAP: usize = 256;

/// A single `contains` requirement, after direct + `allOf`-nested aggregation.
#[derive(Debug, Clone)]
pub struct ContainsNeed {
    pub canon_path: String,
    pub min: u64,
    pub max: Option<u64>,
    /// A coarse discriminator used for pairwise-disjointness analysis: the
    /// need's `const` value, or its sorted `enum` values, or its `type`.
    pub discriminator: Discriminator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Discriminator {
    Const(Value),
    Enum(Vec<Value>),
    Type(Vec<String>),
    Unknown,
}

impl Discriminator {
    /// Conservative pairwise disjointness: only `const`/`enum` discriminators
    /// with no overlapping values, or disjoint `type` sets, are considered
    /// provably disjoint. `Unknown` is never provably disjoint from anything.
    #[must_use]
    pub fn provably_disjoint_from(&self, other: &Discriminator) -> bool {
        match (self, other) {
            (Discriminator::Const(a), Discriminator::Const(b)) => a != b,
            (Discriminator::Const(a), Discriminator::Enum(b)) | (Discriminator::Enum(b), Discriminator::Const(a)) => {
                !b.contains(a)
            }
            (Discriminator::Enum(a), Discriminator::Enum(b)) => !a.iter().any(|v| b.contains(v)),
            (Discriminator::Type(a), Discriminator::Type(b)) => !a.iter().any(|t| b.contains(t)),
            _ => false,
        }
    }
}

/// Extract a coarse [`Discriminator`] (`const`, `enum`, or `type`) from a
/// schema node, for pairwise disjointness analysis.
#[must_use]
pub(crate) fn discriminator_of(node: &CanonicalNode) -> Discriminator {
    let CanonicalNode::Object { entries, .. } = node else {
        return Discriminator::Unknown;
    };
    if let Some(v) = entries.get("const").and_then(CanonicalNode::as_schema_value) {
        return Discriminator::Const(v.clone());
    }
    if let Some(CanonicalNode::Array { children, .. }) = entries.get("enum") {
        let values: Vec<Value> = children.iter().filter_map(CanonicalNode::as_schema_value).cloned().collect();
        return Discriminator::Enum(values);
    }
    match entries.get("type").and_then(CanonicalNode::as_schema_value) {
        Some(Value::String(t)) => Discriminator::Type(vec![t.clone()]),
        Some(Value::Array(types)) => {
            Discriminator::Type(types.iter().filter_map(Value::as_str).map(str::to_string).collect())
        }
        _ => Discriminator::Unknown,
    }
}

fn as_u64(node: Option<&CanonicalNode>) -> Option<u64> {
    node.and_then(CanonicalNode::as_schema_value).and_then(Value::as_u64)
}

fn collect_need(node: &CanonicalNode, canon_path: &str, needs: &mut Vec<ContainsNeed>) {
    let CanonicalNode::Object { entries, .. } = node else {
        return;
    };
    if let Some(contains) = entries.get("contains") {
        let min = as_u64(entries.get("minContains")).unwrap_or(1);
        let max = as_u64(entries.get("maxContains"));
        needs.push(ContainsNeed {
            canon_path: format!("{canon_path}/contains"),
            min,
            max,
            discriminator: discriminator_of(contains),
        });
    }
    if let Some(CanonicalNode::Array { children, .. }) = entries.get("allOf") {
        for (i, child) in children.iter().enumerate() {
            collect_need(child, &format!("{canon_path}/allOf/{i}"), needs);
        }
    }
}

/// The aggregated contains bag for an array-like node.
#[derive(Debug, Clone, Default)]
pub struct ContainsBag {
    pub needs: Vec<ContainsNeed>,
    pub capped: bool,
}

/// Aggregate direct and `allOf`-nested contains needs under `owner`.
pub fn build_contains_bag(owner: &CanonicalNode, canon_path: &str, env: &mut DiagnosticEnvelope) -> ContainsBag {
    let mut needs = Vec::new();
    collect_need(owner, canon_path, &mut needs);

    let capped = needs.len() > CONTAINS_BAG_CAP;
    if capped {
        needs.truncate(CONTAINS_BAG_CAP);
        env.record_cap(DiagCode::ComplexityCapContains);
        env.push_warn(
            DiagEntry::with_details(
                DiagCode::ComplexityCapContains,
                canon_path.to_string(),
                serde_json::json!({ "limit": CONTAINS_BAG_CAP }),
            ),
            Phase::Compose,
        );
    }

    for need in &needs {
        if let Some(max) = need.max {
            if need.min > max {
                env.push_fatal(
                    DiagEntry::with_details(
                        DiagCode::ContainsNeedMinGtMax,
                        need.canon_path.clone(),
                        serde_json::json!({ "min": need.min, "max": max }),
                    ),
                    Phase::Compose,
                );
            }
        }
    }

    env.push_run(
        DiagEntry::with_details(
            DiagCode::ContainsBagCombined,
            canon_path.to_string(),
            serde_json::json!({ "needCount": needs.len() }),
        ),
        Phase::Compose,
    );

    ContainsBag { needs, capped }
}

/// Validate the contains bag against an `effectiveMaxItems` (the node's own
/// `maxItems`, if any). Emits `CONTAINS_UNSAT_BY_SUM` as fatal when needs are
/// pairwise provably disjoint, else as a non-fatal unsat hint.
pub fn check_contains_against_max_items(
    bag: &ContainsBag,
    effective_max_items: Option<u64>,
    canon_path: &str,
    env: &mut DiagnosticEnvelope,
) {
    let Some(effective_max_items) = effective_max_items else {
        return;
    };

    for need in &bag.needs {
        if need.min > effective_max_items {
            env.push_fatal(
                DiagEntry::with_details(
                    DiagCode::ContainsUnsatBySum,
                    need.canon_path.clone(),
                    serde_json::json!({ "disjointness": "provable", "min": need.min, "effectiveMaxItems": effective_max_items }),
                ),
                Phase::Compose,
            );
        }
    }

    let sum: u64 = bag.needs.iter().map(|n| n.min).sum();
    if sum > effective_max_items {
        let pairwise_disjoint = bag
            .needs
            .iter()
            .enumerate()
            .all(|(i, a)| bag.needs[i + 1..].iter().all(|b| a.discriminator.provably_disjoint_from(&b.discriminator)));

        if pairwise_disjoint {
            env.push_fatal(
                DiagEntry::with_details(
                    DiagCode::ContainsUnsatBySum,
                    canon_path.to_string(),
                    serde_json::json!({ "disjointness": "provable", "sum": sum, "effectiveMaxItems": effective_max_items }),
                ),
                Phase::Compose,
            );
        } else {
            env.push_unsat_hint(
                UnsatHint {
                    code: DiagCode::ContainsUnsatBySum,
                    canon_path: canon_path.to_string(),
                    provable: Some(false),
                    reason: Some("sumExceedsMaxItemsUnknownDisjointness".to_string()),
                    details: Some(serde_json::json!({ "sum": sum, "effectiveMaxItems": effective_max_items })),
                },
                Phase::Compose,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, NormalizeOptions};
    use serde_json::json;

    fn mirror(schema: &Value) -> CanonicalNode {
        normalize(schema, &NormalizeOptions::default()).unwrap().root
    }

    #[test]
    fn need_min_gt_max_is_fatal() {
        let schema = json!({
            "type": "array",
            "contains": {"type": "string"},
            "minContains": 5,
            "maxContains": 2
        });
        let root = mirror(&schema);
        let mut env = DiagnosticEnvelope::new();
        build_contains_bag(&root, "#", &mut env);
        assert!(env.fatal.iter().any(|e| e.code == DiagCode::ContainsNeedMinGtMax));
    }

    #[test]
    fn single_need_exceeding_max_items_is_fatal() {
        let schema = json!({
            "type": "array",
            "contains": {"type": "string"},
            "minContains": 10,
            "maxItems": 3
        });
        let root = mirror(&schema);
        let mut env = DiagnosticEnvelope::new();
        let bag = build_contains_bag(&root, "#", &mut env);
        check_contains_against_max_items(&bag, Some(3), "#", &mut env);
        assert!(env.fatal.iter().any(|e| e.code == DiagCode::ContainsUnsatBySum));
    }

    #[test]
    fn disjoint_consts_sum_exceeding_max_items_is_fatal() {
        let schema = json!({
            "type": "array",
            "maxItems": 2,
            "allOf": [
                {"contains": {"const": "a"}, "minContains": 1},
                {"contains": {"const": "b"}, "minContains": 1},
                {"contains": {"const": "c"}, "minContains": 1}
            ]
        });
        let root = mirror(&schema);
        let mut env = DiagnosticEnvelope::new();
        let bag = build_contains_bag(&root, "#", &mut env);
        assert_eq!(bag.needs.len(), 3);
        check_contains_against_max_items(&bag, Some(2), "#", &mut env);
        assert!(env.fatal.iter().any(|e| e.code == DiagCode::ContainsUnsatBySum));
    }

    #[test]
    fn non_disjoint_sum_exceeding_max_items_is_hint_not_fatal() {
        let schema = json!({
            "type": "array",
            "maxItems": 1,
            "allOf": [
                {"contains": {"type": "string"}, "minContains": 1},
                {"contains": {"type": "number"}, "minContains": 1}
            ]
        });
        let root = mirror(&schema);
        let mut env = DiagnosticEnvelope::new();
        let bag = build_contains_bag(&root, "#", &mut env);
        check_contains_against_max_items(&bag, Some(1), "#", &mut env);
        assert!(!env.fatal.iter().any(|e| e.code == DiagCode::ContainsUnsatBySum));
        assert!(env.unsat_hints.iter().any(|h| h.code == DiagCode::ContainsUnsatBySum));
    }

    #[test]
    fn discriminator_const_vs_enum_overlap_is_not_disjoint() {
        let a = Discriminator::Const(json!("x"));
        let b = Discriminator::Enum(vec![json!("x"), json!("y")]);
        assert!(!a.provably_disjoint_from(&b));
    }

    #[test]
    fn discriminator_type_sets_disjoint() {
        let a = Discriminator::Type(vec!["string".to_string()]);
        let b = Discriminator::Type(vec!["number".to_string()]);
        assert!(a.provably_disjoint_from(&b));
    }
}
