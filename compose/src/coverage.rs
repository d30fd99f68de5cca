//! Coverage index: the set of object-property names provably admitted by an
//! `additionalProperties:false` node and its `allOf` conjuncts (§4.4).

use std::collections::BTreeSet;

use sdgen_kernel::canon::CanonicalNode;
use sdgen_kernel::diag::{DiagCode, DiagEntry, DiagnosticEnvelope, Phase, UnsatHint};
use sdgen_kernel::regex::{classify, Classification};
use serde_json::Value;

/// Default cap on enumerated coverage names before `COMPLEXITY_CAP_ENUM` fires.
pub const ENUM_CAP: usize = 4096;

/// A single anchored patternProperties key, classified once at build time.
#[derive(Debug, Clone)]
pub struct PatternConjunct {
    pub source: String,
    pub literals: Option<Vec<String>>,
    pub unsafe_pattern: bool,
    compiled: Option<regex::Regex>,
}

impl PatternConjunct {
    fn matches(&self, name: &str) -> bool {
        self.compiled.as_ref().is_some_and(|re| re.is_match(name))
    }
}

#[derive(Debug, Clone, Default)]
struct ConjunctCoverage {
    named: BTreeSet<String>,
    patterns: Vec<PatternConjunct>,
    additional_properties_true: bool,
}

impl ConjunctCoverage {
    fn has(&self, name: &str) -> bool {
        self.named.contains(name)
            || self.patterns.iter().any(|p| !p.unsafe_pattern && p.matches(name))
            || self.additional_properties_true
    }

    fn is_enumerable(&self) -> bool {
        !self.additional_properties_true
            && self.patterns.iter().all(|p| !p.unsafe_pattern && p.literals.is_some())
    }

    fn enumerate(&self) -> Option<BTreeSet<String>> {
        if !self.is_enumerable() {
            return None;
        }
        let mut out = self.named.clone();
        for p in &self.patterns {
            if let Some(literals) = &p.literals {
                out.extend(literals.iter().cloned());
            }
        }
        Some(out)
    }

    fn has_any_source(&self) -> bool {
        !self.named.is_empty() || !self.patterns.is_empty() || self.additional_properties_true
    }
}

/// The coverage surface of an `additionalProperties:false` object node: the
/// owner's own conjunct plus one conjunct per `allOf` branch. Membership and
/// enumeration are both defined as the intersection across all conjuncts,
/// since every `allOf` branch independently constrains the instance.
#[derive(Debug, Clone, Default)]
pub struct CoverageEntry {
    conjuncts: Vec<ConjunctCoverage>,
    /// Set when enumeration was truncated at [`ENUM_CAP`].
    pub enum_capped: bool,
}

impl CoverageEntry {
    /// True if `name` is provably admitted by every conjunct.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        !self.conjuncts.is_empty() && self.conjuncts.iter().all(|c| c.has(name))
    }

    /// The full set of provably-admitted names, when every conjunct is
    /// itself finitely enumerable (no unsafe or non-literal patterns, no
    /// bare `additionalProperties:true`).
    #[must_use]
    pub fn enumerate(&self) -> Option<Vec<String>> {
        let mut iter = self.conjuncts.iter();
        let first = iter.next()?.enumerate()?;
        let mut acc = first;
        for c in iter {
            let set = c.enumerate()?;
            acc = acc.intersection(&set).cloned().collect();
        }
        let mut out: Vec<String> = acc.into_iter().collect();
        if out.len() > ENUM_CAP {
            out.truncate(ENUM_CAP);
        }
        Some(out)
    }

    /// True when at least one conjunct contributes a named/pattern/AP:true
    /// coverage source (used by the empty-coverage unsat check).
    #[must_use]
    pub fn has_any_coverage_source(&self) -> bool {
        self.conjuncts.iter().any(ConjunctCoverage::has_any_source)
    }

    /// True if any contributing conjunct has an unsafe patternProperties key.
    #[must_use]
    pub fn has_unsafe_pattern(&self) -> bool {
        self.conjuncts
            .iter()
            .any(|c| c.patterns.iter().any(|p| p.unsafe_pattern))
    }
}

fn node_bool(node: Option<&CanonicalNode>) -> Option<bool> {
    node.and_then(CanonicalNode::as_schema_value).and_then(Value::as_bool)
}

fn build_conjunct(node: &CanonicalNode, canon_path: &str, env: &mut DiagnosticEnvelope) -> Option<ConjunctCoverage> {
    let CanonicalNode::Object { entries, .. } = node else {
        return None;
    };

    let mut named = BTreeSet::new();
    if let Some(CanonicalNode::Object { entries: props, .. }) = entries.get("properties") {
        named.extend(props.keys().iter().cloned());
    }

    let mut patterns = Vec::new();
    if let Some(CanonicalNode::Object { entries: pp, .. }) = entries.get("patternProperties") {
        for key in pp.keys() {
            let (literals, unsafe_pattern) = match classify(key) {
                Classification::AnchoredSafe { literals } => (literals.map(|l| l.alternatives), false),
                Classification::Unsafe => {
                    env.push_warn(
                        DiagEntry::with_details(
                            DiagCode::ApFalseUnsafePattern,
                            canon_path.to_string(),
                            serde_json::json!({ "pattern": key }),
                        ),
                        Phase::Compose,
                    );
                    (None, true)
                }
                Classification::ComplexityCapped { .. } | Classification::CompileError { .. } => {
                    (None, true)
                }
            };
            let compiled = regex::Regex::new(key).ok();
            patterns.push(PatternConjunct {
                source: key.clone(),
                literals,
                unsafe_pattern,
                compiled,
            });
        }
    }

    let additional_properties_true = matches!(node_bool(entries.get("additionalProperties")), Some(true))
        || matches!(entries.get("additionalProperties"), Some(CanonicalNode::Object { .. }));

    Some(ConjunctCoverage {
        named,
        patterns,
        additional_properties_true,
    })
}

/// Build the coverage index for an object-like node: its own conjunct plus
/// one per direct `allOf` branch.
pub fn build_coverage(owner: &CanonicalNode, canon_path: &str, env: &mut DiagnosticEnvelope) -> CoverageEntry {
    let mut conjuncts = Vec::new();
    if let Some(c) = build_conjunct(owner, canon_path, env) {
        conjuncts.push(c);
    }
    if let CanonicalNode::Object { entries, .. } = owner {
        if let Some(CanonicalNode::Array { children, .. }) = entries.get("allOf") {
            for (i, child) in children.iter().enumerate() {
                let child_path = format!("{canon_path}/allOf/{i}");
                if let Some(c) = build_conjunct(child, &child_path, env) {
                    conjuncts.push(c);
                }
            }
        }
    }
    CoverageEntry {
        conjuncts,
        enum_capped: false,
    }
}

/// Disjunction of `minProperties>0`, non-empty `required`, or a required
/// `dependentRequired` antecedent (the antecedent-required case is left for
/// a future `dependentRequired`-aware walk; see `DESIGN.md`).
#[must_use]
pub fn presence_pressure(owner: &CanonicalNode) -> bool {
    let CanonicalNode::Object { entries, .. } = owner else {
        return false;
    };
    let min_properties_positive = entries
        .get("minProperties")
        .and_then(CanonicalNode::as_schema_value)
        .and_then(Value::as_u64)
        .is_some_and(|v| v > 0);
    let required_nonempty =
        matches!(entries.get("required"), Some(CanonicalNode::Array { children, .. }) if !children.is_empty());
    min_properties_positive || required_nonempty
}

fn required_keys(owner: &CanonicalNode) -> Vec<String> {
    let CanonicalNode::Object { entries, .. } = owner else {
        return Vec::new();
    };
    let Some(CanonicalNode::Array { children, .. }) = entries.get("required") else {
        return Vec::new();
    };
    children
        .iter()
        .filter_map(CanonicalNode::as_schema_value)
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn property_names_enum(owner: &CanonicalNode) -> Option<Vec<String>> {
    let CanonicalNode::Object { entries, .. } = owner else {
        return None;
    };
    let CanonicalNode::Object { entries: pn, .. } = entries.get("propertyNames")? else {
        return None;
    };
    let CanonicalNode::Array { children, .. } = pn.get("enum")? else {
        return None;
    };
    Some(
        children
            .iter()
            .filter_map(CanonicalNode::as_schema_value)
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// Run the early object-level unsat checks (§4.4) against an already-built
/// coverage index, recording fatal diagnostics or unsat hints as needed.
/// Returns `true` if a fatal diagnostic was recorded.
pub fn check_early_unsat(
    owner: &CanonicalNode,
    canon_path: &str,
    coverage: &CoverageEntry,
    env: &mut DiagnosticEnvelope,
) -> bool {
    let mut fatal = false;

    if let Some(names) = property_names_enum(owner) {
        let min_properties_positive = matches!(owner, CanonicalNode::Object { entries, .. }
            if entries.get("minProperties").and_then(CanonicalNode::as_schema_value).and_then(Value::as_u64).is_some_and(|v| v > 0));
        if names.is_empty() && min_properties_positive {
            env.push_fatal(
                DiagEntry::new(DiagCode::UnsatMinpropsPnames, canon_path.to_string()),
                Phase::Compose,
            );
            fatal = true;
        }
        for req in required_keys(owner) {
            if !names.iter().any(|n| n == &req) {
                env.push_fatal(
                    DiagEntry::with_details(
                        DiagCode::UnsatRequiredPnames,
                        canon_path.to_string(),
                        serde_json::json!({ "key": req }),
                    ),
                    Phase::Compose,
                );
                fatal = true;
            }
        }
    }

    let ap_false = matches!(owner, CanonicalNode::Object { entries, .. }
        if matches!(node_bool(entries.get("additionalProperties")), Some(false)));

    if ap_false {
        for req in required_keys(owner) {
            if !coverage.has(&req) {
                let code = if property_names_enum(owner).is_some() {
                    DiagCode::UnsatRequiredVsPropertynames
                } else {
                    DiagCode::UnsatApFalseEmptyCoverage
                };
                env.push_fatal(
                    DiagEntry::with_details(code, canon_path.to_string(), serde_json::json!({ "key": req })),
                    Phase::Compose,
                );
                fatal = true;
            }
        }

        let min_properties = owner_min_properties(owner);
        if let (Some(min_properties), Some(names)) = (min_properties, coverage.enumerate()) {
            if names.len() < min_properties as usize {
                env.push_fatal(
                    DiagEntry::with_details(
                        DiagCode::UnsatMinpropertiesVsCoverage,
                        canon_path.to_string(),
                        serde_json::json!({ "minProperties": min_properties, "coverage": names.len() }),
                    ),
                    Phase::Compose,
                );
                fatal = true;
            }
        }

        if presence_pressure(owner) && !coverage.has_any_coverage_source() {
            env.push_fatal(
                DiagEntry::new(DiagCode::UnsatApFalseEmptyCoverage, canon_path.to_string()),
                Phase::Compose,
            );
            fatal = true;
        } else if presence_pressure(owner) && coverage.has_any_coverage_source() && coverage.enumerate().is_none() {
            env.push_unsat_hint(
                UnsatHint {
                    code: DiagCode::UnsatApFalseEmptyCoverage,
                    canon_path: canon_path.to_string(),
                    provable: Some(false),
                    reason: Some("coverageUnknown".to_string()),
                    details: None,
                },
                Phase::Compose,
            );
            env.push_warn(
                DiagEntry::with_details(
                    DiagCode::ApFalseIntersectionApprox,
                    canon_path.to_string(),
                    serde_json::json!({ "reason": "presencePressure" }),
                ),
                Phase::Compose,
            );
        }
    }

    fatal
}

fn owner_min_properties(owner: &CanonicalNode) -> Option<u64> {
    let CanonicalNode::Object { entries, .. } = owner else {
        return None;
    };
    entries
        .get("minProperties")
        .and_then(CanonicalNode::as_schema_value)
        .and_then(Value::as_u64)
}
