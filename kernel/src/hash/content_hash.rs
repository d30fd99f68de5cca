//! Content-addressed hash type and the canonical hashing entry point.

use sha2::{Digest, Sha256};

use super::domain::HashDomain;

/// A content-addressed hash with algorithm identifier.
///
/// Format: `"algorithm:hex_digest"` (e.g. `"sha256:abcdef..."`).
///
/// Invariant: the inner string always contains exactly one `:` separator,
/// with non-empty substrings on both sides (enforced by [`ContentHash::parse`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse from `"algorithm:hex_digest"` format.
    ///
    /// Validation rules (enforced to prevent "almost-valid" artifacts):
    /// - Exactly one `:` separator.
    /// - Algorithm: non-empty, ASCII lowercase alphanumeric only.
    /// - Digest: non-empty, lowercase hex only (`[0-9a-f]+`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if s[colon + 1..].contains(':') {
            return None;
        }

        let algorithm = &s[..colon];
        let digest = &s[colon + 1..];

        if algorithm.is_empty()
            || !algorithm
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return None;
        }

        if digest.is_empty()
            || !digest
                .bytes()
                .all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
        {
            return None;
        }

        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    /// The algorithm portion (e.g. `"sha256"`).
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    /// The hex digest portion.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    /// The full string representation (`"algorithm:hex_digest"`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

/// Compute the canonical hash of a byte slice with domain separation.
///
/// Algorithm: SHA-256. Computes `sha256(domain.as_bytes() || data)` and
/// returns `"sha256:<hex_digest>"`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(data);
    let digest = hasher.finalize();
    let full = format!("sha256:{}", hex::encode(digest));
    ContentHash { full, colon: 6 }
}
