//! Anchored-subset lifting (§4.1, §4.2).
//!
//! When a `patternProperties`/`pattern` regex is not itself anchored-safe,
//! Compose may still lift an anchored subset out of it for coverage and
//! `additionalProperties: false` enumeration purposes, at the cost of the
//! `AP_FALSE_INTERSECTION_APPROX` diagnostic it must attach. Two lift
//! families are supported: *strict* (the pattern already reduces to an exact
//! literal alternation) and *substring* (an unanchored body can be wrapped in
//! `^(?:body)$` without changing which literals it matches, when the body
//! contains no free anchors itself).

use super::analyzer::{classify, Classification, LiteralAlternation};

/// Which lift family produced a [`LiftedPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchoredKind {
    /// The source pattern already classified as anchored-safe; no lift needed.
    Native,
    /// Exact literal alternation extracted from an anchored wrapper.
    Strict,
    /// The body was anchored-wrapped (`^(?:body)$`) and re-classified safe.
    Substring,
}

/// The result of attempting to lift an anchored subset from a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiftedPattern {
    /// The anchored pattern source to use in place of the original.
    pub source: String,
    pub used_anchored_subset: bool,
    pub anchored_kind: AnchoredKind,
    /// Exact literals, when the strict family applies.
    pub literals: Option<LiteralAlternation>,
}

/// Attempt to lift an anchored subset from `pattern`. Returns `None` when no
/// lift family applies (the pattern must then be treated as fully unsafe for
/// coverage purposes).
#[must_use]
pub fn lift_anchored_subset(pattern: &str) -> Option<LiftedPattern> {
    match classify(pattern) {
        Classification::AnchoredSafe { literals } => Some(LiftedPattern {
            source: pattern.to_string(),
            used_anchored_subset: false,
            anchored_kind: AnchoredKind::Native,
            literals,
        }),
        Classification::Unsafe => lift_unsafe(pattern),
        Classification::ComplexityCapped { .. } | Classification::CompileError { .. } => None,
    }
}

fn lift_unsafe(pattern: &str) -> Option<LiftedPattern> {
    if let Some(lifted) = try_strict_lift(pattern) {
        return Some(lifted);
    }
    try_substring_lift(pattern)
}

/// Strict family: the pattern (ignoring any existing partial anchors) reduces
/// to an exact literal alternation once fully anchored.
fn try_strict_lift(pattern: &str) -> Option<LiftedPattern> {
    let body = strip_existing_anchors(pattern);
    let wrapped = format!("^(?:{body})$");
    match classify(&wrapped) {
        Classification::AnchoredSafe {
            literals: Some(literals),
        } => Some(LiftedPattern {
            source: wrapped,
            used_anchored_subset: true,
            anchored_kind: AnchoredKind::Strict,
            literals: Some(literals),
        }),
        _ => None,
    }
}

/// Substring family: wrap the unanchored body in `^(?:body)$`. Valid only
/// when the body carries no free `^`/`$` of its own (which would change
/// meaning once nested inside a group) and the wrapped form still compiles
/// and is anchored-safe.
fn try_substring_lift(pattern: &str) -> Option<LiftedPattern> {
    if pattern.contains('^') || pattern.contains('$') {
        return None;
    }
    let wrapped = format!("^(?:{pattern})$");
    match classify(&wrapped) {
        Classification::AnchoredSafe { literals } => Some(LiftedPattern {
            source: wrapped,
            used_anchored_subset: true,
            anchored_kind: AnchoredKind::Substring,
            literals,
        }),
        _ => None,
    }
}

/// Strip a leading `^` and/or trailing `$` from `pattern`, if present, so the
/// body can be re-wrapped cleanly.
fn strip_existing_anchors(pattern: &str) -> &str {
    pattern
        .strip_prefix('^')
        .unwrap_or(pattern)
        .strip_suffix('$')
        .unwrap_or_else(|| pattern.strip_prefix('^').unwrap_or(pattern))
}
