//! Generate: consumes a compose plan and emits `count` items (§4.5).
//!
//! # Crate dependency graph
//!
//! ```text
//! sdgen-kernel  ←  sdgen-compose  ←  sdgen-generate
//! ```
//!
//! Generate never re-scores `anyOf`/`oneOf` branches -- it reads the
//! decision Compose already recorded and, for `oneOf`, performs a minimal
//! exclusivity repair against the original schema.

#![forbid(unsafe_code)]

pub mod error;
pub mod exclusivity;
pub mod kinds;
pub mod rational;
pub mod runner;

pub use error::{GenerateError, ItemOutcome};
pub use runner::{generate, GenerateOptions, GenerateReport};
