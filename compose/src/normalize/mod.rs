//! Normalize: canonicalize a user schema into canonical form (§4.3).

pub mod mirror;
pub mod rewrite;

pub use rewrite::NormalizeOptions;

use sdgen_kernel::canon::{CanonicalNode, NormalizeNote, PtrMap};

use crate::error::NormalizeError;

/// The result of a Normalize run.
#[derive(Debug, Clone)]
pub struct NormalizeOutput {
    pub root: CanonicalNode,
    pub ptr_map: PtrMap,
    pub notes: Vec<NormalizeNote>,
}

/// Rewrite `schema` to canonical form and mirror it into a [`CanonicalNode`]
/// tree with pointer provenance.
///
/// # Errors
///
/// Returns [`NormalizeError`] when the root schema shape is invalid or a
/// rewrite guard is violated (`$defs` target missing in strict mode,
/// generated `not`-nesting budget exceeded).
pub fn normalize(
    schema: &serde_json::Value,
    options: &NormalizeOptions,
) -> Result<NormalizeOutput, NormalizeError> {
    let mut rewritten = schema.clone();
    let mut notes = Vec::new();
    let mut overrides = rewrite::OriginOverrides::new();

    let defs_index = rewrite::collect_defs_index(&rewritten);
    rewrite::rewrite_schema(
        &mut rewritten,
        "#",
        "#",
        &mut rewrite::RewriteCtx {
            notes: &mut notes,
            overrides: &mut overrides,
            options,
            defs_index: &defs_index,
            not_nesting_depth: 0,
        },
    )?;

    let mut ptr_map = PtrMap::new();
    let root = mirror::mirror(&rewritten, "#", &overrides, &mut ptr_map);

    Ok(NormalizeOutput {
        root,
        ptr_map,
        notes,
    })
}
