//! Canonical JSON bytes and content-addressed hashing.
//!
//! Exactly one place produces canonical JSON bytes in this workspace; every
//! hashing flow that touches JSON routes through [`canon_json::canonical_json_bytes`].

pub mod canon_json;
pub mod content_hash;
pub mod domain;

pub use canon_json::{canonical_json_bytes, CanonError};
pub use content_hash::{canonical_hash, ContentHash};
pub use domain::HashDomain;
