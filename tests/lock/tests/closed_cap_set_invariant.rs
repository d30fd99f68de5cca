//! §8 invariant 6: `diag.caps` is drawn only from the closed cap-code set,
//! and every code recorded on an envelope actually originates from a phase
//! it is allowed to originate from.

use sdgen_kernel::diag::{DiagCode, DiagEntry, DiagnosticEnvelope, Phase};

const CAP_CODES: &[DiagCode] = &[
    DiagCode::ComplexityCapOneof,
    DiagCode::ComplexityCapAnyof,
    DiagCode::ComplexityCapEnum,
    DiagCode::ComplexityCapContains,
    DiagCode::ComplexityCapSchemaSize,
];

const NON_CAP_CODES: &[DiagCode] = &[
    DiagCode::ComplexityCapPatterns,
    DiagCode::ExclusivityTweakString,
    DiagCode::ValidationSkipped,
    DiagCode::UnsatApFalseEmptyCoverage,
    DiagCode::PnamesRewriteApplied,
];

#[test]
fn only_the_five_complexity_cap_codes_are_cap_codes() {
    for code in CAP_CODES {
        assert!(code.is_cap_code(), "{code:?} must be a cap code");
    }
    for code in NON_CAP_CODES {
        assert!(!code.is_cap_code(), "{code:?} must not be a cap code");
    }
}

#[test]
fn record_cap_dedupes_and_sorts_across_a_mixed_sequence() {
    let mut env = DiagnosticEnvelope::new();
    env.record_cap(DiagCode::ComplexityCapSchemaSize);
    env.record_cap(DiagCode::ComplexityCapAnyof);
    env.record_cap(DiagCode::ComplexityCapOneof);
    env.record_cap(DiagCode::ComplexityCapAnyof);
    assert_eq!(env.caps.len(), 3);
    assert!(env.caps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn every_code_pushed_is_valid_from_its_declared_phase() {
    for code in CAP_CODES.iter().chain(NON_CAP_CODES.iter()) {
        for phase in [Phase::Normalize, Phase::Compose, Phase::Generate] {
            assert_eq!(
                code.is_valid_from(phase),
                code.allowed_phases().contains(&phase),
                "{code:?} at {phase:?} disagrees with its own phase table"
            );
        }
    }

    let mut env = DiagnosticEnvelope::new();
    env.push_fatal(DiagEntry::new(DiagCode::UnsatApFalseEmptyCoverage, "#".to_string()), Phase::Compose);
    assert!(env.fatal.iter().any(|e| e.code == DiagCode::UnsatApFalseEmptyCoverage));
}
