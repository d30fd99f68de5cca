//! Canonical AST: the typed tree Normalize produces and Compose/Generate
//! read, plus the pointer maps that preserve provenance into the user schema.

pub mod node;
pub mod note;
pub mod pointer;

pub use node::{CanonicalNode, ObjectEntries};
pub use note::NormalizeNote;
pub use pointer::{PtrMap, RevPtrMap};
