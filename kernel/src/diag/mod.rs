//! Diagnostics: the closed code catalog, severity ordering, branch-decision
//! data shapes, and the wire-form envelope (§3, §6, §7).

pub mod branch_decision;
pub mod codes;
pub mod envelope;

pub use branch_decision::{BranchDecision, BranchKind, Budget, ScoreDetails};
pub use codes::{DiagCode, Phase};
pub use envelope::{DiagEntry, DiagnosticEnvelope, Severity, UnsatHint};
