//! `ComposePlan`: the aggregate artifact produced by walking the canonical
//! AST once (depth-first, stable child order) and recording coverage,
//! contains bags, and branch decisions (§4.4).

use std::collections::BTreeMap;

use sdgen_kernel::canon::{CanonicalNode, NormalizeNote, PtrMap};
use sdgen_kernel::diag::{BranchKind, DiagCode, DiagnosticEnvelope};
use sdgen_kernel::hash::{canonical_hash, canonical_json_bytes, HashDomain};
use serde_json::Value;

use crate::branch::{collect_branch_stats, compute_memo_key, select_branch};
use crate::contains::{build_contains_bag, check_contains_against_max_items, ContainsBag};
use crate::coverage::{build_coverage, check_early_unsat, CoverageEntry};
use crate::error::ComposeError;
use crate::memo::BranchMemo;
use crate::normalize::{normalize, NormalizeOptions};

/// `trials` option group.
#[derive(Debug, Clone)]
pub struct TrialsOptions {
    pub per_branch: u32,
    pub max_branches_to_try: usize,
    pub skip_trials: bool,
    pub skip_trials_if_branches_gt: Option<usize>,
}

impl Default for TrialsOptions {
    fn default() -> Self {
        Self {
            per_branch: 2,
            max_branches_to_try: 4,
            skip_trials: false,
            skip_trials_if_branches_gt: None,
        }
    }
}

/// `guards` option group.
#[derive(Debug, Clone)]
pub struct GuardsOptions {
    pub max_generated_not_nesting: u32,
    pub max_dynamic_scope_hops: u32,
}

impl Default for GuardsOptions {
    fn default() -> Self {
        Self {
            max_generated_not_nesting: 2,
            max_dynamic_scope_hops: 8,
        }
    }
}

/// `rational` option group.
#[derive(Debug, Clone)]
pub struct RationalOptions {
    pub decimal_precision: u32,
    pub fallback: RationalFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RationalFallback {
    Decimal,
    Float,
}

impl Default for RationalOptions {
    fn default() -> Self {
        Self {
            decimal_precision: 6,
            fallback: RationalFallback::Decimal,
        }
    }
}

/// `complexity` option group.
#[derive(Debug, Clone)]
pub struct ComplexityOptions {
    pub max_one_of_branches: Option<usize>,
    pub max_any_of_branches: Option<usize>,
    pub max_enum_cardinality: usize,
    pub max_contains_needs: usize,
    pub max_schema_bytes: usize,
}

impl Default for ComplexityOptions {
    fn default() -> Self {
        Self {
            max_one_of_branches: None,
            max_any_of_branches: None,
            max_enum_cardinality: crate::coverage::ENUM_CAP,
            max_contains_needs: crate::contains::CONTAINS_BAG_CAP,
            max_schema_bytes: 1_000_000,
        }
    }
}

/// `cache` option group.
#[derive(Debug, Clone)]
pub struct CacheOptions {
    pub lru_size: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { lru_size: 4096 }
    }
}

/// `patternPolicy` option group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsafePatternPolicy {
    Error,
    Warn,
}

/// Full Compose configuration, built via [`ComposeOptionsBuilder`] to keep
/// fields immutable once constructed (§9 "Builder vs direct construction").
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    pub normalize: NormalizeOptions,
    pub trials: TrialsOptions,
    pub guards: GuardsOptions,
    pub rational: RationalOptions,
    pub complexity: ComplexityOptions,
    pub cache: CacheOptions,
    pub unsafe_pattern_policy: UnsafePatternPolicy,
    pub global_seed: u64,
    pub ajv_sub_key: String,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::default(),
            trials: TrialsOptions::default(),
            guards: GuardsOptions::default(),
            rational: RationalOptions::default(),
            complexity: ComplexityOptions::default(),
            cache: CacheOptions::default(),
            unsafe_pattern_policy: UnsafePatternPolicy::Warn,
            global_seed: 0,
            ajv_sub_key: "default".to_string(),
        }
    }
}

/// Builder for [`ComposeOptions`].
#[derive(Debug, Clone, Default)]
pub struct ComposeOptionsBuilder {
    options: ComposeOptions,
}

impl ComposeOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn global_seed(mut self, seed: u64) -> Self {
        self.options.global_seed = seed;
        self
    }

    #[must_use]
    pub fn max_schema_bytes(mut self, limit: usize) -> Self {
        self.options.complexity.max_schema_bytes = limit;
        self
    }

    #[must_use]
    pub fn max_branches_to_try(mut self, limit: usize) -> Self {
        self.options.trials.max_branches_to_try = limit;
        self
    }

    #[must_use]
    pub fn unsafe_pattern_policy(mut self, policy: UnsafePatternPolicy) -> Self {
        self.options.unsafe_pattern_policy = policy;
        self
    }

    #[must_use]
    pub fn ajv_sub_key(mut self, key: impl Into<String>) -> Self {
        self.options.ajv_sub_key = key.into();
        self
    }

    #[must_use]
    pub fn build(self) -> ComposeOptions {
        self.options
    }
}

/// The aggregate Compose output: canonical AST, pointer maps, coverage and
/// contains indices keyed by canonical path, and the diagnostic envelope.
#[derive(Debug, Clone)]
pub struct ComposePlan {
    pub root: CanonicalNode,
    pub ptr_map: PtrMap,
    pub normalize_notes: Vec<NormalizeNote>,
    pub coverage: BTreeMap<String, CoverageEntry>,
    pub contains: BTreeMap<String, ContainsBag>,
    pub diag: DiagnosticEnvelope,
    pub schema_hash: String,
}

fn node_to_value(node: &CanonicalNode) -> Value {
    match node {
        CanonicalNode::Value { schema, .. } => schema.clone(),
        CanonicalNode::Array { children, .. } => Value::Array(children.iter().map(node_to_value).collect()),
        CanonicalNode::Object { entries, .. } => {
            let mut map = serde_json::Map::new();
            for (key, child) in entries.iter() {
                map.insert(key.to_string(), node_to_value(child));
            }
            Value::Object(map)
        }
    }
}

fn effective_max_items(node: &CanonicalNode) -> Option<u64> {
    let CanonicalNode::Object { entries, .. } = node else {
        return None;
    };
    entries.get("maxItems").and_then(CanonicalNode::as_schema_value).and_then(Value::as_u64)
}

fn has_applicator(node: &CanonicalNode, key: &str) -> bool {
    matches!(node, CanonicalNode::Object { entries, .. } if entries.contains_key(key))
}

struct Walker<'a> {
    options: &'a ComposeOptions,
    coverage: BTreeMap<String, CoverageEntry>,
    contains: BTreeMap<String, ContainsBag>,
    diag: DiagnosticEnvelope,
    memo: BranchMemo,
}

impl<'a> Walker<'a> {
    fn visit(&mut self, node: &CanonicalNode, canon_path: &str) {
        if has_applicator(node, "additionalProperties") {
            let ap_false = matches!(node, CanonicalNode::Object { entries, .. }
                if matches!(entries.get("additionalProperties").and_then(CanonicalNode::as_schema_value).and_then(Value::as_bool), Some(false)));
            if ap_false {
                let coverage = build_coverage(node, canon_path, &mut self.diag);
                check_early_unsat(node, canon_path, &coverage, &mut self.diag);
                self.coverage.insert(canon_path.to_string(), coverage);
            }
        }

        if has_applicator(node, "contains") {
            let bag = build_contains_bag(node, canon_path, &mut self.diag);
            check_contains_against_max_items(&bag, effective_max_items(node), canon_path, &mut self.diag);
            if bag.needs.len() > self.options.complexity.max_contains_needs {
                self.diag.record_cap(DiagCode::ComplexityCapContains);
            }
            self.contains.insert(canon_path.to_string(), bag);
        }

        if let CanonicalNode::Object { entries, .. } = node {
            for (key, kind, cap_code) in [
                ("anyOf", BranchKind::AnyOf, DiagCode::ComplexityCapAnyof),
                ("oneOf", BranchKind::OneOf, DiagCode::ComplexityCapOneof),
            ] {
                if let Some(CanonicalNode::Array { children, .. }) = entries.get(key) {
                    let branch_path = sdgen_kernel::canon::pointer::push_token(canon_path, key);
                    let stats = collect_branch_stats(children);
                    let score_only = self.options.trials.skip_trials
                        || self
                            .options
                            .trials
                            .skip_trials_if_branches_gt
                            .is_some_and(|limit| stats.len() > limit);
                    let cap_limit = if key == "anyOf" {
                        self.options.complexity.max_any_of_branches
                    } else {
                        self.options.complexity.max_one_of_branches
                    };
                    if let Some(limit) = cap_limit {
                        if stats.len() > limit {
                            self.diag.record_cap(cap_code);
                        }
                    }
                    let memo_key = compute_memo_key(&branch_path, self.options.global_seed, &self.options.ajv_sub_key);
                    let decision = if let Some(cached) = self.memo.get(&memo_key) {
                        cached.clone()
                    } else {
                        let selection = select_branch(
                            &branch_path,
                            kind,
                            &stats,
                            self.options.global_seed,
                            self.options.trials.max_branches_to_try,
                            score_only,
                            &self.options.ajv_sub_key,
                        );
                        self.memo.insert(memo_key, selection.decision.clone());
                        selection.decision
                    };
                    self.diag.branch_decisions.push(decision);

                    for (i, child) in children.iter().enumerate() {
                        self.visit(child, &format!("{branch_path}/{i}"));
                    }
                }
            }

            for key in ["properties", "patternProperties", "$defs", "dependentSchemas"] {
                if let Some(CanonicalNode::Object { entries: children, .. }) = entries.get(key) {
                    for (child_key, child) in children.iter() {
                        let child_path = sdgen_kernel::canon::pointer::push_token(
                            &sdgen_kernel::canon::pointer::push_token(canon_path, key),
                            child_key,
                        );
                        self.visit(child, &child_path);
                    }
                }
            }

            for key in ["additionalProperties", "propertyNames", "contains", "not", "if", "then", "else", "items"] {
                if let Some(child) = entries.get(key) {
                    let child_path = sdgen_kernel::canon::pointer::push_token(canon_path, key);
                    self.visit(child, &child_path);
                }
            }

            for key in ["allOf", "prefixItems"] {
                if let Some(CanonicalNode::Array { children, .. }) = entries.get(key) {
                    for (i, child) in children.iter().enumerate() {
                        self.visit(child, &format!("{canon_path}/{key}/{i}"));
                    }
                }
            }
        }
    }
}

/// Run Normalize, then walk the canonical AST once to build coverage,
/// contains bags, and branch decisions.
///
/// # Errors
///
/// Returns [`ComposeError::SchemaSizeExceeded`] when the canonicalized
/// schema exceeds `complexity.maxSchemaBytes`, or propagates a
/// [`crate::error::NormalizeError`]-derived fatal through the envelope.
pub fn compose(schema: &Value, options: &ComposeOptions) -> Result<ComposePlan, ComposeError> {
    let normalized = normalize(schema, &options.normalize).map_err(|e| ComposeError::Unsat {
        canon_path: "#".to_string(),
        reason: e.to_string(),
    })?;

    let canonical_value = node_to_value(&normalized.root);
    let bytes = canonical_json_bytes(&canonical_value).unwrap_or_default();
    if bytes.len() > options.complexity.max_schema_bytes {
        return Err(ComposeError::SchemaSizeExceeded {
            limit: options.complexity.max_schema_bytes,
            observed: bytes.len(),
        });
    }
    let schema_hash = canonical_hash(HashDomain::SchemaCanonical, &bytes).as_str().to_string();

    let diag = DiagnosticEnvelope::new();
    let mut walker = Walker {
        options,
        coverage: BTreeMap::new(),
        contains: BTreeMap::new(),
        diag,
        memo: BranchMemo::with_capacity(options.cache.lru_size),
    };
    walker.visit(&normalized.root, "#");

    Ok(ComposePlan {
        root: normalized.root,
        ptr_map: normalized.ptr_map,
        normalize_notes: normalized.notes,
        coverage: walker.coverage,
        contains: walker.contains,
        diag: walker.diag,
        schema_hash,
    })
}
