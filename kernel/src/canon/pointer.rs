//! Pointer maps: `ptrMap` (canonical → origin) and `revPtrMap` (origin →
//! sorted canonical pointers), plus RFC 6901 JSON Pointer helpers.
//!
//! Invariants (§3, §8 invariant 1): every canonical node's path appears in
//! `ptrMap`; `revPtrMap` is its exact inverse, with value lists kept sorted
//! for output stability.

use std::collections::{BTreeMap, BTreeSet};

/// Escape a single reference token per RFC 6901 (`~` → `~0`, `/` → `~1`).
#[must_use]
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Append a reference token to a JSON Pointer string.
#[must_use]
pub fn push_token(base: &str, token: &str) -> String {
    format!("{base}/{}", escape_token(token))
}

/// Append a numeric array index to a JSON Pointer string.
#[must_use]
pub fn push_index(base: &str, index: usize) -> String {
    format!("{base}/{index}")
}

/// `ptrMap`: canonical pointer → origin pointer. Total over every present
/// canonical path.
#[derive(Debug, Clone, Default)]
pub struct PtrMap {
    inner: BTreeMap<String, String>,
}

impl PtrMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `canon_path` was derived from `origin_path`.
    pub fn insert(&mut self, canon_path: impl Into<String>, origin_path: impl Into<String>) {
        self.inner.insert(canon_path.into(), origin_path.into());
    }

    /// Look up the origin pointer for a canonical path.
    #[must_use]
    pub fn get(&self, canon_path: &str) -> Option<&str> {
        self.inner.get(canon_path).map(String::as_str)
    }

    /// Number of recorded canonical paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate `(canon_path, origin_path)` pairs in canonical-path sort order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build the inverse map: origin pointer → sorted set of canonical pointers.
    #[must_use]
    pub fn invert(&self) -> RevPtrMap {
        let mut rev: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (canon_path, origin_path) in &self.inner {
            rev.entry(origin_path.clone())
                .or_default()
                .insert(canon_path.clone());
        }
        RevPtrMap { inner: rev }
    }
}

/// `revPtrMap`: origin pointer → sorted set of canonical pointers.
#[derive(Debug, Clone, Default)]
pub struct RevPtrMap {
    inner: BTreeMap<String, BTreeSet<String>>,
}

impl RevPtrMap {
    /// Canonical pointers derived from `origin_path`, in sorted order.
    #[must_use]
    pub fn get(&self, origin_path: &str) -> Option<&BTreeSet<String>> {
        self.inner.get(origin_path)
    }

    /// True if `origin_path` produced at least one canonical node.
    #[must_use]
    pub fn contains(&self, origin_path: &str) -> bool {
        self.inner.contains_key(origin_path)
    }

    /// Number of distinct origin pointers recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Verify this is the exact inverse of `ptr_map` (§8 invariant 1).
    ///
    /// Used by tests/assertions rather than production control flow.
    #[must_use]
    pub fn is_exact_inverse_of(&self, ptr_map: &PtrMap) -> bool {
        let rebuilt = ptr_map.invert();
        rebuilt.inner == self.inner
    }
}
