//! §8 scenario 2: `anyOf` branch from compose.
//!
//! `{anyOf:[{const:11},{const:22}]}`, seed fixed → item equals
//! `anyOf[chosenBranch.index].const`; same seed gives the same choice.

use sdgen_lock_tests::helpers::{compose_default, generate_default};
use serde_json::json;

#[test]
fn generated_item_matches_the_recorded_branch_choice() {
    let schema = json!({"anyOf": [{"const": 11}, {"const": 22}]});
    let plan = compose_default(&schema, 3);
    let chosen = plan.diag.branch_decisions[0].chosen_index;
    let expected = schema["anyOf"][chosen]["const"].clone();

    let report = generate_default(&plan, 1, 3);
    assert_eq!(report.items[0].as_ref().unwrap(), &expected);
}

#[test]
fn same_seed_gives_the_same_choice_across_runs() {
    let schema = json!({"anyOf": [{"const": 11}, {"const": 22}]});
    let plan_a = compose_default(&schema, 5);
    let plan_b = compose_default(&schema, 5);
    assert_eq!(
        plan_a.diag.branch_decisions[0].chosen_index,
        plan_b.diag.branch_decisions[0].chosen_index
    );
}
