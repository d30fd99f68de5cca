//! Top-level Generate orchestration: draws `count` items from a compose
//! plan and returns their outcomes alongside the accumulated diagnostic
//! envelope (§4.5, §6).

use sdgen_compose::plan::{ComposePlan, RationalOptions};
use sdgen_kernel::ajv::ValidatorAdapter;
use sdgen_kernel::canon::CanonicalNode;
use sdgen_kernel::diag::DiagnosticEnvelope;

use crate::error::{GenerateError, ItemOutcome};
use crate::kinds::{generate_node, CallCounters, GenCtx};

/// `conditionals.exclusivityStringTweak` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExclusivityStringTweak {
    #[default]
    Default,
    PreferAscii,
}

/// `conditionals` option group.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalsOptions {
    pub exclusivity_string_tweak: ExclusivityStringTweak,
}

/// `patternWitness` option group.
#[derive(Debug, Clone)]
pub struct PatternWitnessOptions {
    pub alphabet: String,
    pub max_length: usize,
    pub max_candidates: usize,
}

impl Default for PatternWitnessOptions {
    fn default() -> Self {
        Self {
            alphabet: String::new(),
            max_length: 4,
            max_candidates: 256,
        }
    }
}

/// Full Generate configuration. `validator` is the optional external
/// reference-validator adapter used for final instance validation and
/// `oneOf` exclusivity checks (§4.9) -- Generate never constructs one
/// itself.
pub struct GenerateOptions<'v> {
    pub count: usize,
    pub global_seed: u64,
    pub validate_formats: bool,
    pub prefer_examples: bool,
    pub rational: RationalOptions,
    pub conditionals: ConditionalsOptions,
    pub pattern_witness: PatternWitnessOptions,
    pub validator: Option<&'v dyn ValidatorAdapter>,
}

impl<'v> Default for GenerateOptions<'v> {
    fn default() -> Self {
        Self {
            count: 1,
            global_seed: 0,
            validate_formats: true,
            prefer_examples: false,
            rational: RationalOptions::default(),
            conditionals: ConditionalsOptions::default(),
            pattern_witness: PatternWitnessOptions::default(),
            validator: None,
        }
    }
}

/// The result of a Generate run: each item's outcome plus the diagnostic
/// envelope (Compose's envelope, extended with Generate-phase entries).
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub items: Vec<ItemOutcome>,
    pub diag: DiagnosticEnvelope,
}

/// Run Generate over `plan`, drawing `options.count` items.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidRootNode`] when the plan's root is the
/// literal schema `false` (no item can ever satisfy it), or
/// [`GenerateError::PlanUnsat`] when Compose already recorded a fatal
/// diagnostic at the root.
pub fn generate<'v>(plan: &ComposePlan, options: &GenerateOptions<'v>) -> Result<GenerateReport, GenerateError> {
    if matches!(&plan.root, CanonicalNode::Value { schema, .. } if schema.as_bool() == Some(false)) {
        return Err(GenerateError::InvalidRootNode {
            detail: "root schema is the literal `false`".to_string(),
        });
    }
    if plan.diag.has_fatal_at("#") {
        return Err(GenerateError::PlanUnsat {
            canon_path: "#".to_string(),
        });
    }

    let ctx = GenCtx { plan, options };
    let mut diag = DiagnosticEnvelope::new();
    let mut counters: CallCounters = CallCounters::new();
    let mut items = Vec::with_capacity(options.count);

    for _ in 0..options.count {
        let outcome = generate_node(&plan.root, "#", &ctx, &mut diag, &mut counters);
        if outcome.is_err() {
            diag.metrics.validate_errors += 1;
        }
        items.push(outcome);
    }

    let mut full_diag = plan.diag.clone();
    full_diag.fatal.extend(diag.fatal);
    full_diag.warn.extend(diag.warn);
    full_diag.run.extend(diag.run);
    full_diag.unsat_hints.extend(diag.unsat_hints);
    full_diag.metrics.validate_errors += diag.metrics.validate_errors;
    full_diag.metrics.pattern_witness_tried += diag.metrics.pattern_witness_tried;

    Ok(GenerateReport { items, diag: full_diag })
}
