//! Name automata: Thompson NFA construction, determinization, product
//! construction, and bounded BFS enumeration (§4.2).
//!
//! Operates over anchored-safe regex bodies only (the caller strips the
//! `^...$` wrapper before calling [`nfa::build`]). The alphabet is bytes;
//! patterns outside the ASCII range are out of scope and rejected by the
//! mini-parser as a `CompileError`-equivalent (the caller falls back to
//! predicate-only coverage in that case, same as a cap breach).

pub mod bfs;
pub mod dfa;
pub mod nfa;

pub use bfs::{enumerate, BfsStats, EnumerationLimits};
pub use dfa::{determinize, product, Dfa, DfaState};
pub use nfa::{build as build_nfa, Nfa, NfaError};

/// Which automaton-construction stage a complexity cap was hit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapComponent {
    Nfa,
    Dfa,
    Product,
    Bfs,
}
