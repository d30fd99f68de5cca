//! The diagnostic envelope: `{fatal, warn, unsatHints, run, nodes,
//! branchDecisions, caps, overlaps, metrics}` (§3, §6).

use std::collections::BTreeMap;

use super::branch_decision::BranchDecision;
use super::codes::DiagCode;

/// Severity ordering: `fatal > warn > hint > run` (§3, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Run,
    Hint,
    Warn,
    Fatal,
}

/// A single diagnostic entry: `{code, canonPath, details?}`.
///
/// Not `Eq`: `details` is a `serde_json::Value`, which is not `Eq` (its
/// `Number` variant may hold an `f64`).
#[derive(Debug, Clone, PartialEq)]
pub struct DiagEntry {
    pub code: DiagCode,
    pub canon_path: String,
    pub details: Option<serde_json::Value>,
}

impl DiagEntry {
    #[must_use]
    pub fn new(code: DiagCode, canon_path: impl Into<String>) -> Self {
        Self {
            code,
            canon_path: canon_path.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(
        code: DiagCode,
        canon_path: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code,
            canon_path: canon_path.into(),
            details: Some(details),
        }
    }
}

/// An unsat hint: a `DiagEntry` plus non-provability metadata.
///
/// Not `Eq`: see [`DiagEntry`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnsatHint {
    pub code: DiagCode,
    pub canon_path: String,
    pub provable: Option<bool>,
    pub reason: Option<String>,
    pub details: Option<serde_json::Value>,
}

/// Per-node diagnostic projection for the `nodes` map in the wire form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDiag {
    pub chosen_branch_index: Option<usize>,
    pub has_score_details: bool,
    pub has_budget: bool,
}

/// Aggregate run metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    pub memo_keys: usize,
    pub validate_errors: usize,
    pub pattern_witness_tried: usize,
}

/// Pattern-overlap diagnostics (`diag.overlaps`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlaps {
    /// `{key, patterns[]}` pairs recorded when pattern-overlap analysis ran.
    pub patterns: Vec<(String, Vec<String>)>,
}

/// The full diagnostic envelope produced by a Normalize→Compose→Generate run.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticEnvelope {
    pub fatal: Vec<DiagEntry>,
    pub warn: Vec<DiagEntry>,
    pub unsat_hints: Vec<UnsatHint>,
    pub run: Vec<DiagEntry>,
    pub nodes: BTreeMap<String, NodeDiag>,
    pub branch_decisions: Vec<BranchDecision>,
    pub caps: Vec<DiagCode>,
    pub overlaps: Overlaps,
    pub metrics: Metrics,
}

impl DiagnosticEnvelope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fatal diagnostic. Asserts the code is legal from `phase` --
    /// the phase-table enforcement §6 requires.
    pub fn push_fatal(&mut self, entry: DiagEntry, phase: super::codes::Phase) {
        debug_assert!(entry.code.is_valid_from(phase), "{:?} not valid from {phase:?}", entry.code);
        self.fatal.push(entry);
    }

    /// Record a warn diagnostic.
    pub fn push_warn(&mut self, entry: DiagEntry, phase: super::codes::Phase) {
        debug_assert!(entry.code.is_valid_from(phase), "{:?} not valid from {phase:?}", entry.code);
        self.warn.push(entry);
    }

    /// Record a run-tier diagnostic.
    pub fn push_run(&mut self, entry: DiagEntry, phase: super::codes::Phase) {
        debug_assert!(entry.code.is_valid_from(phase), "{:?} not valid from {phase:?}", entry.code);
        self.run.push(entry);
    }

    /// Record an unsat hint.
    pub fn push_unsat_hint(&mut self, hint: UnsatHint, phase: super::codes::Phase) {
        debug_assert!(hint.code.is_valid_from(phase), "{:?} not valid from {phase:?}", hint.code);
        self.unsat_hints.push(hint);
    }

    /// Record a cap code in the closed `caps` list (deduplicated, sorted).
    pub fn record_cap(&mut self, code: DiagCode) {
        debug_assert!(code.is_cap_code(), "{code:?} is not a cap code");
        if !self.caps.contains(&code) {
            self.caps.push(code);
            self.caps.sort();
        }
    }

    /// True if any fatal diagnostic was recorded at or under `canon_path`
    /// (exact match only; callers needing subtree checks should filter the
    /// `fatal` vec directly with their own prefix rule).
    #[must_use]
    pub fn has_fatal_at(&self, canon_path: &str) -> bool {
        self.fatal.iter().any(|e| e.canon_path == canon_path)
    }

    /// Highest severity tier present in the envelope, if any.
    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        if !self.fatal.is_empty() {
            Some(Severity::Fatal)
        } else if !self.warn.is_empty() {
            Some(Severity::Warn)
        } else if !self.unsat_hints.is_empty() {
            Some(Severity::Hint)
        } else if !self.run.is_empty() {
            Some(Severity::Run)
        } else {
            None
        }
    }
}
