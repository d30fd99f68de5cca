//! `NormalizeNote`: additive, order-preserved record of a schema rewrite.

use serde::{Deserialize, Serialize};

/// A note recorded by Normalize describing a rewrite or a skipped rewrite.
///
/// Notes are additive: once recorded, a note is never discarded, and
/// `Normalize(Normalize(S))` re-emits the same note set (§8 idempotence).
///
/// Not `Eq`: `details` is a `serde_json::Value`, which is not `Eq`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizeNote {
    /// The canonical path the note is attached to.
    pub canon_path: String,
    /// The note code (e.g. `"PNAMES_REWRITE_APPLIED"`, `"DEFS_TARGET_MISSING"`).
    pub code: String,
    /// Optional structured detail payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl NormalizeNote {
    /// Construct a note with no detail payload.
    #[must_use]
    pub fn new(canon_path: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            canon_path: canon_path.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Construct a note carrying a structured detail payload.
    #[must_use]
    pub fn with_details(
        canon_path: impl Into<String>,
        code: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            canon_path: canon_path.into(),
            code: code.into(),
            details: Some(details),
        }
    }
}
