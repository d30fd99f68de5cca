//! Branch decision data shapes (§3 "Branch decision").
//!
//! Pure data: the scoring algorithm that produces these values lives in the
//! Compose crate (`sdgen_compose::branch`). These types are shared data
//! model because the diagnostic envelope -- a kernel-level concept -- embeds
//! them, and Generate reads them back without re-scoring (§4.5).

/// `anyOf` or `oneOf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    AnyOf,
    OneOf,
}

/// The budget bookkeeping recorded alongside a branch decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    /// Number of branches actually trialed.
    pub tried: usize,
    /// `perBranch * kEffective`.
    pub limit: usize,
    /// Number of branches skipped due to budget/score-only mode.
    pub skipped: usize,
    /// Why trials were skipped, if they were.
    pub reason: Option<String>,
}

/// Scoring detail payload for auditability (§3, §4.4, §8 invariant 4).
///
/// Not `Eq`: `tiebreak_rand`/`exclusivity_rand` are `f64`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreDetails {
    /// All branch indices, sorted descending score / ascending index.
    pub ordered_indices: Vec<usize>,
    /// Indices sharing the maximum score.
    pub top_score_indices: Vec<usize>,
    /// `topScoreIndices` truncated to `min(maxBranchesToTry, cap, len)`.
    pub top_k_indices: Vec<usize>,
    /// The `[0,1)` draw used to break a tie among `topScoreIndices`, when the
    /// RNG was consulted. Recorded even when `|topScoreIndices| == 1` under
    /// score-only mode (§8 invariant 4 -- this is intentional, not a bug).
    pub tiebreak_rand: Option<f64>,
    /// The `[0,1)` draw used during `oneOf` step-4 exclusivity re-selection.
    pub exclusivity_rand: Option<f64>,
    /// Raw score per branch index, for audit/debugging.
    pub scores_by_index: Vec<(usize, i64)>,
}

/// A single `anyOf`/`oneOf` branch decision, as recorded in the plan.
///
/// Not `Eq`: embeds [`ScoreDetails`], which carries `f64` draws.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchDecision {
    pub canon_path: String,
    pub kind: BranchKind,
    pub chosen_index: usize,
    pub chosen_score: i64,
    pub score_details: ScoreDetails,
    pub budget: Budget,
    /// Stable hash key used for the bounded LRU memo cache.
    pub memo_key: String,
}

impl BranchDecision {
    /// §8 invariant 4: `chosenBranch.index ∈ topScoreIndices` and
    /// `topScoreIndices ⊆ orderedIndices`.
    #[must_use]
    pub fn satisfies_topscore_invariant(&self) -> bool {
        let in_top = self.score_details.top_score_indices.contains(&self.chosen_index);
        let subset = self
            .score_details
            .top_score_indices
            .iter()
            .all(|i| self.score_details.ordered_indices.contains(i));
        in_top && subset
    }
}
