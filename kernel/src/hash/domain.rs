//! Typed domain separators for canonical hashing.
//!
//! Every production hash computation selects a domain via [`HashDomain`].
//! This module is the single authority for domain-separator byte strings.
//! Adding a new domain is a single change here -- the enum, `as_bytes()`,
//! `ALL`, and `Display` are all generated from the same macro invocation.

/// Declares `HashDomain`, `as_bytes()`, `ALL`, and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`super::canonical_hash`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// The raw domain-separator bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domain variants in declaration order.
            pub const ALL: &[HashDomain] = &[ $( Self::$variant, )+ ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    // -----------------------------------------------------------------
    // Normalize
    // -----------------------------------------------------------------

    /// Hash of a canonicalized schema (used for schema-size/byte accounting).
    SchemaCanonical => b"SDGEN::SCHEMA_CANONICAL::V1\0",

    /// Canonical pointer string hashing for `revPtrMap` ordering ties.
    PointerOrdering => b"SDGEN::POINTER_ORDERING::V1\0",

    // -----------------------------------------------------------------
    // Compose
    // -----------------------------------------------------------------

    /// Branch decision memoization key.
    BranchMemoKey => b"SDGEN::BRANCH_MEMO_KEY::V1\0",

    /// Coverage enumeration content hashing (for dedup of enumerated names).
    CoverageEnumeration => b"SDGEN::COVERAGE_ENUMERATION::V1\0",

    /// Contains-bag need hashing (for disjointness/subsumption memoization).
    ContainsNeed => b"SDGEN::CONTAINS_NEED::V1\0",

    // -----------------------------------------------------------------
    // RNG seeding
    // -----------------------------------------------------------------

    /// `stableStringHash(canonPath)` domain for RNG seed derivation.
    RngPathSeed => b"SDGEN::RNG_PATH_SEED::V1\0",

    // -----------------------------------------------------------------
    // Generate
    // -----------------------------------------------------------------

    /// Deterministic format-witness suffix derivation (uuid/email/uri/date-time).
    FormatWitness => b"SDGEN::FORMAT_WITNESS::V1\0",

    /// Pattern-witness candidate ordering hash.
    PatternWitness => b"SDGEN::PATTERN_WITNESS::V1\0",

    // -----------------------------------------------------------------
    // Benchmarks
    // -----------------------------------------------------------------

    /// Benchmark input-snapshot hashing (`benchmarks/benches/generate_regimes.rs`).
    BenchInput => b"SDGEN::BENCH_INPUT::V1\0",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_domains_are_null_terminated() {
        for domain in HashDomain::ALL {
            assert!(domain.as_bytes().ends_with(&[0]), "{domain} not null-terminated");
        }
    }

    #[test]
    fn all_domains_are_distinct() {
        let mut seen = std::collections::BTreeSet::new();
        for domain in HashDomain::ALL {
            assert!(seen.insert(domain.as_bytes()), "duplicate domain bytes for {domain}");
        }
    }

    #[test]
    fn display_matches_variant_name() {
        assert_eq!(HashDomain::BranchMemoKey.to_string(), "BranchMemoKey");
    }
}
