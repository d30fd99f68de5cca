//! Typed Normalize/Compose errors.

/// Typed failure from the Normalize phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// `$ref` target not found under the nearest enclosing `$id`/`$defs` scope.
    DefsTargetMissing { canon_path: String, target: String },

    /// The document root is not an object or boolean schema.
    InvalidRootSchema { detail: String },

    /// Generated `not`-nesting from conditional rewriting exceeded
    /// `guards.maxGeneratedNotNesting`.
    NotNestingBudgetExceeded { canon_path: String, limit: u32 },
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DefsTargetMissing { canon_path, target } => {
                write!(f, "$ref target missing at {canon_path}: {target}")
            }
            Self::InvalidRootSchema { detail } => write!(f, "invalid root schema: {detail}"),
            Self::NotNestingBudgetExceeded { canon_path, limit } => write!(
                f,
                "generated not-nesting budget exceeded at {canon_path} (limit {limit})"
            ),
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Typed failure from the Compose phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    /// The canonicalized schema exceeds `complexity.maxSchemaBytes`.
    SchemaSizeExceeded { limit: usize, observed: usize },

    /// A fatal UNSAT was recorded at `canon_path`; the caller may still
    /// consult `diag` for the full envelope.
    Unsat { canon_path: String, reason: String },
}

impl std::fmt::Display for ComposeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchemaSizeExceeded { limit, observed } => {
                write!(f, "schema size cap exceeded: {observed} > {limit} bytes")
            }
            Self::Unsat { canon_path, reason } => {
                write!(f, "unsatisfiable at {canon_path}: {reason}")
            }
        }
    }
}

impl std::error::Error for ComposeError {}
