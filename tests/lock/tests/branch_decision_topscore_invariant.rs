//! §8 invariant 4: `chosenBranch.index ∈ topScoreIndices`, `topScoreIndices
//! ⊆ orderedIndices`, and `tiebreakRand` is recorded whenever the RNG was
//! consulted -- including the `|topScoreIndices| == 1` score-only case.

use sdgen_lock_tests::helpers::compose_default;
use serde_json::json;

#[test]
fn every_recorded_decision_satisfies_the_topscore_invariant() {
    let schema = json!({
        "anyOf": [
            {"const": "a"},
            {"const": 1},
            {"const": true},
            {"const": null}
        ]
    });
    let plan = compose_default(&schema, 7);
    assert!(!plan.diag.branch_decisions.is_empty());
    for decision in &plan.diag.branch_decisions {
        assert!(
            decision.satisfies_topscore_invariant(),
            "decision at {} violates the topScore invariant",
            decision.canon_path
        );
    }
}

#[test]
fn tiebreak_rand_is_recorded_even_for_a_singleton_top_score() {
    let schema = json!({"anyOf": [{"const": "only"}]});
    let plan = compose_default(&schema, 1);
    let decision = &plan.diag.branch_decisions[0];
    assert_eq!(decision.score_details.top_score_indices.len(), 1);
    assert!(decision.score_details.tiebreak_rand.is_some());
}

#[test]
fn same_seed_selects_the_same_branch() {
    let schema = json!({"anyOf": [{"const": 11}, {"const": 22}]});
    let a = compose_default(&schema, 42);
    let b = compose_default(&schema, 42);
    assert_eq!(a.diag.branch_decisions[0].chosen_index, b.diag.branch_decisions[0].chosen_index);
}
