//! Deterministic RNG: XorShift32 seeded by `(globalSeed, canonPath)`.
//!
//! Every stochastic decision in Compose/Generate is labeled with the
//! `canonPath` that produced it (§5). No global or ambient entropy is ever
//! consulted -- the only inputs are the caller's `globalSeed` and the node's
//! pointer string.

use crate::hash::{canonical_hash, HashDomain};

/// Deterministic, non-cryptographic PRNG. Never seeded from wall-clock time
/// or OS entropy -- the engine performs no I/O (§5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Construct from a raw non-zero seed. A zero seed is remapped to a
    /// fixed non-zero constant since XorShift32 is degenerate at zero.
    #[must_use]
    pub const fn from_seed(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    /// Derive a seed from `(globalSeed, canonPath)` via `stableStringHash`,
    /// then construct the generator.
    ///
    /// This is the only sanctioned way to create an [`XorShift32`] for
    /// Compose/Generate branch decisions -- it guarantees the
    /// `(globalSeed, canonPath)` determinism invariant in §5.
    #[must_use]
    pub fn seeded(global_seed: u64, canon_path: &str) -> Self {
        Self::from_seed(stable_string_hash(global_seed, canon_path))
    }

    /// Advance the generator and return the next raw `u32`.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Draw a float in `[0, 1)` with 24 bits of entropy (mirrors the
    /// precision of an `f32` mantissa, keeping cross-platform determinism).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.next_u32() >> 8; // top 24 bits
        f64::from(bits) / f64::from(1u32 << 24)
    }

    /// Draw an index uniformly from `0..len` (`len` must be nonzero).
    ///
    /// # Panics
    ///
    /// Panics if `len == 0`.
    pub fn next_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "next_index requires a nonempty range");
        (self.next_u32() as usize) % len
    }
}

/// Deterministic string hash used to derive per-path RNG seeds.
///
/// Defined as the low 32 bits of `canonical_hash(RngPathSeed, globalSeed_be || path)`.
/// Stable across platforms and process restarts by construction (SHA-256 has
/// no platform-dependent behavior).
#[must_use]
pub fn stable_string_hash(global_seed: u64, canon_path: &str) -> u32 {
    let mut data = Vec::with_capacity(8 + canon_path.len());
    data.extend_from_slice(&global_seed.to_be_bytes());
    data.extend_from_slice(canon_path.as_bytes());
    let digest = canonical_hash(HashDomain::RngPathSeed, &data);
    let hex = digest.hex_digest();
    u32::from_str_radix(&hex[..8], 16).unwrap_or(0x9E37_79B9)
}
