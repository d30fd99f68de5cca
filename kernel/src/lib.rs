//! Synthetic-data kernel: the deterministic, pure-data core shared by
//! Normalize, Compose, and Generate.
//!
//! # API surface
//!
//! - [`canon`] -- canonical node tree, pointer maps, normalize notes
//! - [`regex`] -- regex classification and anchored-subset lifting
//! - [`automata`] -- NFA/DFA/product-DFA construction and bounded BFS
//! - [`hash`] -- canonical JSON bytes, content hashing, domain separation
//! - [`diag`] -- the closed diagnostic code catalog and envelope
//! - [`rng`] -- the deterministic XorShift32 generator and seeding scheme
//! - [`ajv`] -- the reference-validator adapter interface
//!
//! # Module dependency direction
//!
//! `hash` ← `canon` ← `regex` ← `automata`
//!
//! One-way only. No cycles. `diag`, `rng`, and `ajv` depend only on `hash`
//! (for content addressing) and have no dependency on `canon`/`regex`/`automata`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ajv;
pub mod automata;
pub mod canon;
pub mod diag;
pub mod hash;
pub mod regex;
pub mod rng;
