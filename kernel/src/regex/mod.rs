//! Regex analyzer and anchored-subset lifter (§4.1).

pub mod analyzer;
pub mod lift;

pub use analyzer::{classify, Classification, LiteralAlternation};
pub use lift::{lift_anchored_subset, AnchoredKind, LiftedPattern};
