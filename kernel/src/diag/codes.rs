//! The closed diagnostic code catalog and its phase table (§6).
//!
//! "A code-to-phase table MUST be enforced": [`DiagCode::allowed_phases`] is
//! the single authority callers use to assert a code is being emitted from
//! a phase it's actually allowed to originate from (e.g.
//! `REGEX_COMPLEXITY_CAPPED` only from Normalize/Compose;
//! `COMPLEXITY_CAP_PATTERNS` only from Generate).

/// The three pipeline phases a diagnostic can originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Normalize,
    Compose,
    Generate,
}

/// The closed diagnostic code catalog.
///
/// New codes are never invented ad hoc by callers -- every code a phase can
/// emit is a variant here, and [`DiagCode::allowed_phases`] pins which
/// phase(s) may legally emit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagCode {
    // --- Normalize: Boolean simplification ---
    AnyofSimplificationSkippedUnevaluated,
    OneofSimplificationSkippedUnevaluated,
    AllofSimplificationSkippedUnevaluated,

    // --- Normalize: draft unification / ref rewrite ---
    DefsTargetMissing,

    // --- Normalize: conditional rewrite ---
    ConditionalRewriteSkippedBlocked,

    // --- Normalize: propertyNames rewrite ---
    PnamesComplex,
    PnamesRewriteApplied,

    // --- Normalize: dynamic presence ---
    DynamicPresent,

    // --- Normalize + Compose: regex / anchored-subset lifting ---
    ApFalseIntersectionApprox,
    RegexComplexityCapped,

    // --- Compose: name automata ---
    NameAutomatonComplexityCapped,

    // --- Compose: coverage / unsat ---
    UnsatApFalseEmptyCoverage,
    ApFalseUnsafePattern,
    UnsatMinpropsPnames,
    UnsatRequiredPnames,
    UnsatRequiredVsPropertynames,
    UnsatMinpropertiesVsCoverage,
    ComplexityCapEnum,

    // --- Compose: contains bag ---
    ContainsNeedMinGtMax,
    ContainsUnsatBySum,
    ContainsBagCombined,
    ComplexityCapContains,

    // --- Compose: branch selection caps ---
    ComplexityCapOneof,
    ComplexityCapAnyof,
    ComplexityCapSchemaSize,

    // --- Compose: external ref resolution ---
    ExternalRefUnresolved,

    // --- Compose/Generate: validator parity ---
    AjvFlagsMismatch,

    // --- Compose: optional local solver ---
    SolverTimeout,

    // --- Generate: pattern witness search ---
    ComplexityCapPatterns,

    // --- Generate: oneOf exclusivity ---
    ExclusivityTweakString,

    // --- Generate: validation skip ---
    ValidationSkipped,
}

impl DiagCode {
    /// The machine-readable code string, matching the spec's `SCREAMING_SNAKE_CASE` names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnyofSimplificationSkippedUnevaluated => {
                "ANYOF_SIMPLIFICATION_SKIPPED_UNEVALUATED"
            }
            Self::OneofSimplificationSkippedUnevaluated => {
                "ONEOF_SIMPLIFICATION_SKIPPED_UNEVALUATED"
            }
            Self::AllofSimplificationSkippedUnevaluated => {
                "ALLOF_SIMPLIFICATION_SKIPPED_UNEVALUATED"
            }
            Self::DefsTargetMissing => "DEFS_TARGET_MISSING",
            Self::ConditionalRewriteSkippedBlocked => "CONDITIONAL_REWRITE_SKIPPED_BLOCKED",
            Self::PnamesComplex => "PNAMES_COMPLEX",
            Self::PnamesRewriteApplied => "PNAMES_REWRITE_APPLIED",
            Self::DynamicPresent => "DYNAMIC_PRESENT",
            Self::ApFalseIntersectionApprox => "AP_FALSE_INTERSECTION_APPROX",
            Self::RegexComplexityCapped => "REGEX_COMPLEXITY_CAPPED",
            Self::NameAutomatonComplexityCapped => "NAME_AUTOMATON_COMPLEXITY_CAPPED",
            Self::UnsatApFalseEmptyCoverage => "UNSAT_AP_FALSE_EMPTY_COVERAGE",
            Self::ApFalseUnsafePattern => "AP_FALSE_UNSAFE_PATTERN",
            Self::UnsatMinpropsPnames => "UNSAT_MINPROPS_PNAMES",
            Self::UnsatRequiredPnames => "UNSAT_REQUIRED_PNAMES",
            Self::UnsatRequiredVsPropertynames => "UNSAT_REQUIRED_VS_PROPERTYNAMES",
            Self::UnsatMinpropertiesVsCoverage => "UNSAT_MINPROPERTIES_VS_COVERAGE",
            Self::ComplexityCapEnum => "COMPLEXITY_CAP_ENUM",
            Self::ContainsNeedMinGtMax => "CONTAINS_NEED_MIN_GT_MAX",
            Self::ContainsUnsatBySum => "CONTAINS_UNSAT_BY_SUM",
            Self::ContainsBagCombined => "CONTAINS_BAG_COMBINED",
            Self::ComplexityCapContains => "COMPLEXITY_CAP_CONTAINS",
            Self::ComplexityCapOneof => "COMPLEXITY_CAP_ONEOF",
            Self::ComplexityCapAnyof => "COMPLEXITY_CAP_ANYOF",
            Self::ComplexityCapSchemaSize => "COMPLEXITY_CAP_SCHEMA_SIZE",
            Self::ExternalRefUnresolved => "EXTERNAL_REF_UNRESOLVED",
            Self::AjvFlagsMismatch => "AJV_FLAGS_MISMATCH",
            Self::SolverTimeout => "SOLVER_TIMEOUT",
            Self::ComplexityCapPatterns => "COMPLEXITY_CAP_PATTERNS",
            Self::ExclusivityTweakString => "EXCLUSIVITY_TWEAK_STRING",
            Self::ValidationSkipped => "VALIDATION_SKIPPED",
        }
    }

    /// The phase(s) this code may legally originate from.
    #[must_use]
    pub fn allowed_phases(&self) -> &'static [Phase] {
        use Phase::{Compose, Generate, Normalize};
        match self {
            Self::AnyofSimplificationSkippedUnevaluated
            | Self::OneofSimplificationSkippedUnevaluated
            | Self::AllofSimplificationSkippedUnevaluated
            | Self::DefsTargetMissing
            | Self::ConditionalRewriteSkippedBlocked
            | Self::PnamesComplex
            | Self::PnamesRewriteApplied
            | Self::DynamicPresent => &[Normalize],

            // Regex analysis runs in Normalize (rewrite-time classification)
            // and Compose (coverage-time anchored-subset lifting).
            Self::ApFalseIntersectionApprox | Self::RegexComplexityCapped => &[Normalize, Compose],

            Self::NameAutomatonComplexityCapped
            | Self::UnsatApFalseEmptyCoverage
            | Self::ApFalseUnsafePattern
            | Self::UnsatMinpropsPnames
            | Self::UnsatRequiredPnames
            | Self::UnsatRequiredVsPropertynames
            | Self::UnsatMinpropertiesVsCoverage
            | Self::ComplexityCapEnum
            | Self::ContainsNeedMinGtMax
            | Self::ContainsUnsatBySum
            | Self::ContainsBagCombined
            | Self::ComplexityCapContains
            | Self::ComplexityCapOneof
            | Self::ComplexityCapAnyof
            | Self::ComplexityCapSchemaSize
            | Self::ExternalRefUnresolved
            | Self::SolverTimeout => &[Compose],

            // Validator-parity mismatches can be detected whenever a plan is
            // built (Compose) or right before final validation (Generate).
            Self::AjvFlagsMismatch => &[Compose, Generate],

            Self::ComplexityCapPatterns
            | Self::ExclusivityTweakString
            | Self::ValidationSkipped => &[Generate],
        }
    }

    /// True if `phase` is a legal origin for this code.
    #[must_use]
    pub fn is_valid_from(&self, phase: Phase) -> bool {
        self.allowed_phases().contains(&phase)
    }

    /// The closed set of cap codes recorded in `diag.caps` (§4.4).
    #[must_use]
    pub fn is_cap_code(&self) -> bool {
        matches!(
            self,
            Self::ComplexityCapOneof
                | Self::ComplexityCapAnyof
                | Self::ComplexityCapEnum
                | Self::ComplexityCapContains
                | Self::ComplexityCapSchemaSize
        )
    }
}

impl std::fmt::Display for DiagCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
