//! Normalize + Compose: canonicalize a user schema, then plan coverage,
//! contains bags, and branch decisions over it.
//!
//! # Crate dependency graph
//!
//! ```text
//! sdgen-kernel  ←  sdgen-compose  ←  sdgen-generate
//! (pure data)      (normalize, plan)  (runner, kinds)
//! ```

#![forbid(unsafe_code)]

pub mod branch;
pub mod contains;
pub mod coverage;
pub mod error;
pub mod memo;
pub mod normalize;
pub mod plan;

pub use error::{ComposeError, NormalizeError};
pub use normalize::normalize;
pub use plan::{compose, ComposeOptions, ComposeOptionsBuilder, ComposePlan};
