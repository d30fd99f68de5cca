//! Branch selection: per-branch statistics, the fixed scoring table, and
//! deterministic tie-break selection for `anyOf`/`oneOf` nodes (§4.4).
//!
//! Scoring is pure and order-insensitive except through the branch's stable
//! `index` -- two branches with identical statistics always score identically
//! regardless of which other branches are present.

use std::collections::{BTreeMap, BTreeSet};

use sdgen_kernel::canon::CanonicalNode;
use sdgen_kernel::diag::{BranchDecision, BranchKind, Budget, ScoreDetails};
use sdgen_kernel::hash::{canonical_hash, HashDomain};
use sdgen_kernel::rng::XorShift32;
use serde_json::Value;

use crate::contains::{discriminator_of, Discriminator};

const TAG_KEY_DISJOINT_BONUS: i64 = 1000;
const REQUIRED_KEY_BONUS: i64 = 200;
const UNIQUE_SINGLETON_TYPE_BONUS: i64 = 10;
const DISJOINT_PATTERN_BONUS: i64 = 50;
const UNSAFE_OR_OPEN_PENALTY: i64 = -5;
const UNIQUE_REQUIRED_KEY_BONUS: i64 = 120;
const UNIQUE_REQUIRED_KEY_CAP: usize = 4;
const RARE_CONST_BONUS: i64 = 80;
const RARE_CONST_CAP: usize = 5;
const SMALL_ENUM_BONUS: i64 = 30;
const LARGE_ENUM_BONUS: i64 = 60;
const ENUM_PROPERTY_CAP: usize = 5;
const SMALL_ENUM_THRESHOLD: usize = 8;
const MIN_CARDINALITY_SIGNAL_BONUS: i64 = 5;

/// Per-branch statistics gathered from the canonical AST before scoring.
#[derive(Debug, Clone, Default)]
pub struct BranchStats {
    pub index: usize,
    pub property_literals: BTreeSet<String>,
    pub required: BTreeSet<String>,
    pub singleton_type: Option<String>,
    pub anchored_pattern_literals: BTreeSet<String>,
    pub has_unsafe_pattern: bool,
    pub additional_properties_true_with_no_props: bool,
    pub const_properties: Vec<String>,
    pub enum_properties: Vec<(String, usize)>,
    pub min_cardinality_signal_count: u32,
    /// `const`/`enum`/`type` discriminator per required-or-plain property
    /// key, used to tell whether a shared `required` key actually carries
    /// disjoint literals across sibling branches (the discriminated-union
    /// case) rather than just being absent from peers.
    pub key_discriminators: BTreeMap<String, Discriminator>,
}

fn node_bool(node: Option<&CanonicalNode>) -> Option<bool> {
    node.and_then(CanonicalNode::as_schema_value).and_then(Value::as_bool)
}

/// Gather [`BranchStats`] for every branch under an `anyOf`/`oneOf` array.
#[must_use]
pub fn collect_branch_stats(branches: &[CanonicalNode]) -> Vec<BranchStats> {
    branches
        .iter()
        .enumerate()
        .map(|(index, branch)| branch_stats(index, branch))
        .collect()
}

fn branch_stats(index: usize, branch: &CanonicalNode) -> BranchStats {
    let mut stats = BranchStats {
        index,
        ..BranchStats::default()
    };
    let CanonicalNode::Object { entries, .. } = branch else {
        return stats;
    };

    if let Some(CanonicalNode::Object { entries: props, .. }) = entries.get("properties") {
        for (key, child) in props.iter() {
            stats.property_literals.insert(key.to_string());
            if let CanonicalNode::Object { entries: child_entries, .. } = child {
                if child_entries.get("const").is_some() {
                    stats.const_properties.push(key.to_string());
                }
                if let Some(CanonicalNode::Array { children, .. }) = child_entries.get("enum") {
                    stats.enum_properties.push((key.to_string(), children.len()));
                }
            }
            let discriminator = discriminator_of(child);
            if !matches!(discriminator, Discriminator::Unknown) {
                stats.key_discriminators.insert(key.to_string(), discriminator);
            }
        }
    }

    if let Some(CanonicalNode::Array { children, .. }) = entries.get("required") {
        for child in children {
            if let Some(Value::String(s)) = child.as_schema_value() {
                stats.required.insert(s.clone());
            }
        }
    }

    match entries.get("type").and_then(CanonicalNode::as_schema_value) {
        Some(Value::String(t)) => stats.singleton_type = Some(t.clone()),
        _ => stats.singleton_type = None,
    }

    if let Some(CanonicalNode::Object { entries: pp, .. }) = entries.get("patternProperties") {
        for key in pp.keys() {
            match sdgen_kernel::regex::classify(key) {
                sdgen_kernel::regex::Classification::AnchoredSafe { literals: Some(l) } => {
                    stats.anchored_pattern_literals.extend(l.alternatives);
                }
                sdgen_kernel::regex::Classification::AnchoredSafe { literals: None } => {}
                _ => stats.has_unsafe_pattern = true,
            }
        }
    }

    let ap_true = matches!(node_bool(entries.get("additionalProperties")), Some(true));
    stats.additional_properties_true_with_no_props = ap_true && stats.property_literals.is_empty();

    for key in ["minProperties", "minItems", "minLength"] {
        if entries
            .get(key)
            .and_then(CanonicalNode::as_schema_value)
            .and_then(Value::as_u64)
            .is_some_and(|v| v > 0)
        {
            stats.min_cardinality_signal_count += 1;
        }
    }

    stats
}

fn tag_key_disjoint_bonus(stats: &BranchStats, peers: &[BranchStats]) -> i64 {
    let mut bonus = 0;
    for key in &stats.required {
        let disjoint = peers
            .iter()
            .filter(|p| p.index != stats.index)
            .all(|p| !p.required.contains(key) || tag_value_disjoint(stats, p, key));
        if disjoint {
            bonus += TAG_KEY_DISJOINT_BONUS;
        }
    }
    bonus
}

/// "Tag key carries disjoint const/enum literals across branches": a shared
/// `required` key is still disjoint if both branches pin it to non-overlapping
/// `const`/`enum`/`type` values (the discriminated-union case), reusing the
/// same [`Discriminator`] analysis `contains` uses for pairwise disjointness.
fn tag_value_disjoint(stats: &BranchStats, peer: &BranchStats, key: &str) -> bool {
    match (stats.key_discriminators.get(key), peer.key_discriminators.get(key)) {
        (Some(a), Some(b)) => a.provably_disjoint_from(b),
        _ => false,
    }
}

/// Score a single branch against its peers per the fixed signal table.
#[must_use]
pub fn score_branch(stats: &BranchStats, peers: &[BranchStats]) -> i64 {
    let mut score = tag_key_disjoint_bonus(stats, peers);

    score += REQUIRED_KEY_BONUS * i64::try_from(stats.required.len()).unwrap_or(i64::MAX);

    if let Some(t) = &stats.singleton_type {
        let unique = peers.iter().filter(|p| p.index != stats.index).all(|p| p.singleton_type.as_ref() != Some(t));
        if unique {
            score += UNIQUE_SINGLETON_TYPE_BONUS;
        }
    }

    let disjoint_patterns = !stats.anchored_pattern_literals.is_empty()
        && peers
            .iter()
            .filter(|p| p.index != stats.index)
            .all(|p| stats.anchored_pattern_literals.is_disjoint(&p.anchored_pattern_literals));
    if disjoint_patterns {
        score += DISJOINT_PATTERN_BONUS;
    }

    if stats.has_unsafe_pattern || stats.additional_properties_true_with_no_props {
        score += UNSAFE_OR_OPEN_PENALTY;
    }

    let unique_required = stats
        .required
        .iter()
        .filter(|key| peers.iter().filter(|p| p.index != stats.index).all(|p| !p.required.contains(*key)))
        .count()
        .min(UNIQUE_REQUIRED_KEY_CAP);
    score += UNIQUE_REQUIRED_KEY_BONUS * i64::try_from(unique_required).unwrap_or(0);

    let rare_consts = stats.const_properties.len().min(RARE_CONST_CAP);
    score += RARE_CONST_BONUS * i64::try_from(rare_consts).unwrap_or(0);

    for (_, enum_size) in stats.enum_properties.iter().take(ENUM_PROPERTY_CAP) {
        score += if *enum_size <= SMALL_ENUM_THRESHOLD {
            SMALL_ENUM_BONUS
        } else {
            LARGE_ENUM_BONUS
        };
    }

    score += MIN_CARDINALITY_SIGNAL_BONUS * i64::from(stats.min_cardinality_signal_count);

    score
}

/// The stable memo key for a branch decision at `canon_path`, independent of
/// the branch statistics themselves -- callers can compute this to consult a
/// [`crate::memo::BranchMemo`] before paying for statistics collection.
#[must_use]
pub fn compute_memo_key(canon_path: &str, global_seed: u64, ajv_sub_key: &str) -> String {
    let bytes = format!("{canon_path}|{global_seed}|{ajv_sub_key}");
    canonical_hash(HashDomain::BranchMemoKey, bytes.as_bytes()).hex_digest().to_string()
}

/// The outcome of selecting a branch for an `anyOf`/`oneOf` node.
#[derive(Debug, Clone)]
pub struct BranchSelection {
    pub decision: BranchDecision,
}

/// Select a branch among `stats` using the fixed scoring table plus
/// deterministic tie-break, recording the full audit trail.
#[must_use]
pub fn select_branch(
    canon_path: &str,
    kind: BranchKind,
    stats: &[BranchStats],
    global_seed: u64,
    max_branches_to_try: usize,
    score_only: bool,
    ajv_sub_key: &str,
) -> BranchSelection {
    let scores_by_index: Vec<(usize, i64)> =
        stats.iter().map(|s| (s.index, score_branch(s, stats))).collect();

    let mut ordered_indices: Vec<usize> = scores_by_index.iter().map(|(i, _)| *i).collect();
    ordered_indices.sort_by(|a, b| {
        let score_a = scores_by_index[*a].1;
        let score_b = scores_by_index[*b].1;
        score_b.cmp(&score_a).then(a.cmp(b))
    });

    let top_score = scores_by_index.iter().map(|(_, s)| *s).max().unwrap_or(0);
    let top_score_indices: Vec<usize> = ordered_indices.iter().copied().filter(|i| scores_by_index[*i].1 == top_score).collect();

    let top_k = max_branches_to_try.min(stats.len()).max(1);
    let top_k_indices: Vec<usize> = ordered_indices.iter().copied().take(top_k).collect();

    let needs_tiebreak = top_score_indices.len() > 1 || score_only;
    let mut rng = XorShift32::seeded(global_seed, canon_path);
    let tiebreak_rand = Some(rng.next_f64());

    let chosen_index = if needs_tiebreak && !top_score_indices.is_empty() {
        let draw = tiebreak_rand.unwrap();
        let pick = (draw * top_score_indices.len() as f64).floor() as usize;
        top_score_indices[pick.min(top_score_indices.len() - 1)]
    } else {
        top_score_indices.first().copied().unwrap_or(0)
    };

    let memo_key = compute_memo_key(canon_path, global_seed, ajv_sub_key);

    let tried = top_k_indices.len();
    let skipped = stats.len().saturating_sub(tried);

    BranchSelection {
        decision: BranchDecision {
            canon_path: canon_path.to_string(),
            kind,
            chosen_index,
            chosen_score: scores_by_index[chosen_index].1,
            score_details: ScoreDetails {
                ordered_indices,
                top_score_indices,
                top_k_indices,
                tiebreak_rand,
                exclusivity_rand: None,
                scores_by_index,
            },
            budget: Budget {
                tried,
                limit: top_k,
                skipped,
                reason: if skipped > 0 { Some("maxBranchesToTry".to_string()) } else { None },
            },
            memo_key,
        },
    }
}
