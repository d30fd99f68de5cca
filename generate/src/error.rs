//! Per-item generation outcome and typed Generate errors.

use serde_json::Value;

/// Why a single item failed to generate (§4.5: `{ok(value) | err({kind, format?, reason?})}`).
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub kind: String,
    pub format: Option<String>,
    pub reason: Option<String>,
}

impl ItemFailure {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            format: None,
            reason: None,
        }
    }

    #[must_use]
    pub fn with_reason(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            format: None,
            reason: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self {
            kind: "unsupported-format".to_string(),
            format: Some(format.into()),
            reason: None,
        }
    }
}

/// The `Result` sum type for a single item (§4.5).
pub type ItemOutcome = Result<Value, ItemFailure>;

/// Top-level Generate failure, distinct from a per-item [`ItemFailure`]: a
/// malformed compose plan or an option that cannot be honored at all.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// The plan's root node is not an object or boolean schema.
    InvalidRootNode { detail: String },
    /// `count` requested but the plan root is unsatisfiable (a fatal
    /// diagnostic was already recorded by Compose).
    PlanUnsat { canon_path: String },
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRootNode { detail } => write!(f, "invalid root node: {detail}"),
            Self::PlanUnsat { canon_path } => write!(f, "plan is unsatisfiable at {canon_path}"),
        }
    }
}

impl std::error::Error for GenerateError {}
