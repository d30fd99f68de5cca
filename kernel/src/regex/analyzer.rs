//! Regex classification (§4.1).
//!
//! Classifies a regex source into one of: *anchored-safe*, *complexity-capped*,
//! *compile-error*, or the unclassified residual ("unsafe" -- valid but not
//! usable for coverage enumeration without an anchored-subset lift, §4.1-§4.2).

const MAX_PATTERN_LEN: usize = 4096;
const MAX_QUANTIFIER_NESTING: usize = 3;

/// The result of classifying a regex source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// `^…$`, no lookaround, no backreference, bounded quantifier depth.
    AnchoredSafe {
        /// Present iff the pattern has the exact shape `^(?:lit1|lit2|…)$`.
        literals: Option<LiteralAlternation>,
    },
    /// Length > 4096, or a grouped quantifier `(…)+|*|?|{n,m}` exceeding the
    /// nesting cap.
    ComplexityCapped { reason: ComplexityCapReason },
    /// The pattern does not compile under Unicode semantics (includes
    /// lookaround/backreference syntax, which this engine never accepts).
    CompileError { message: String },
    /// Compiles, but is neither anchored-safe nor complexity-capped (e.g.
    /// non-anchored or partially-anchored).
    Unsafe,
}

/// Why a pattern was complexity-capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityCapReason {
    LengthExceeded,
    GroupedQuantifierDepth,
}

/// The exact literal alternatives extracted from `^(?:lit1|lit2|…)$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralAlternation {
    pub alternatives: Vec<String>,
}

/// Classify `pattern`.
#[must_use]
pub fn classify(pattern: &str) -> Classification {
    if pattern.len() > MAX_PATTERN_LEN {
        return Classification::ComplexityCapped {
            reason: ComplexityCapReason::LengthExceeded,
        };
    }

    if let Err(err) = regex::Regex::new(pattern) {
        return Classification::CompileError {
            message: err.to_string(),
        };
    }

    if grouped_quantifier_depth(pattern) > MAX_QUANTIFIER_NESTING {
        return Classification::ComplexityCapped {
            reason: ComplexityCapReason::GroupedQuantifierDepth,
        };
    }

    let is_anchored = pattern.starts_with('^') && pattern.ends_with('$');
    let has_lookaround = contains_lookaround(pattern);
    let has_backreference = contains_backreference(pattern);

    if is_anchored && !has_lookaround && !has_backreference {
        let literals = extract_literal_alternation(pattern);
        return Classification::AnchoredSafe { literals };
    }

    Classification::Unsafe
}

/// Deepest nesting of a quantifier applied directly to a parenthesized group
/// (`(...)+`, `(...)*`, `(...)?`, `(...){n,m}`), tracked by the open-paren
/// depth at the moment each quantified group closes.
fn grouped_quantifier_depth(pattern: &str) -> usize {
    let bytes = pattern.as_bytes();
    let mut depth = 0usize;
    let mut max_quantified_depth = 0usize;
    let mut escaped = false;
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if escaped {
            escaped = false;
            i += 1;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' => {
                let closed_at = depth;
                if depth > 0 {
                    depth -= 1;
                }
                let next = bytes.get(i + 1).copied().map(|b| b as char);
                if matches!(next, Some('+') | Some('*') | Some('?'))
                    || starts_brace_quantifier(&bytes[i + 1..])
                {
                    max_quantified_depth = max_quantified_depth.max(closed_at);
                }
            }
            _ => {}
        }
        i += 1;
    }
    max_quantified_depth
}

fn starts_brace_quantifier(rest: &[u8]) -> bool {
    if rest.first().copied() != Some(b'{') {
        return false;
    }
    rest.iter().take_while(|&&b| b != b'}').any(|&b| b.is_ascii_digit())
}

fn contains_lookaround(pattern: &str) -> bool {
    pattern.contains("(?=")
        || pattern.contains("(?!")
        || pattern.contains("(?<=")
        || pattern.contains("(?<!")
}

fn contains_backreference(pattern: &str) -> bool {
    let bytes = pattern.as_bytes();
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if escaped {
            if b.is_ascii_digit() && b != b'0' {
                return true;
            }
            escaped = false;
            continue;
        }
        if b == b'\\' {
            escaped = true;
        }
        let _ = i;
    }
    pattern.contains("\\k<")
}

/// Extract exact literal alternatives from `^(?:lit1|lit2|…)$`, decoding
/// regex-escaped literal characters. Returns `None` if the pattern is not
/// exactly this shape (any metacharacter beyond escaped literals disqualifies it).
fn extract_literal_alternation(pattern: &str) -> Option<LiteralAlternation> {
    let body = pattern.strip_prefix("^(?:")?.strip_suffix(")$")?;
    if body.is_empty() {
        return Some(LiteralAlternation {
            alternatives: vec![String::new()],
        });
    }

    let segments = split_top_level_alternatives(body)?;
    let mut alternatives = Vec::with_capacity(segments.len());
    for seg in segments {
        alternatives.push(unescape_literal(seg)?);
    }
    Some(LiteralAlternation { alternatives })
}

/// Split on top-level `|` (not inside a nested group). Returns `None` if a
/// `(` is encountered, since that means the body is not pure literal
/// alternation.
fn split_top_level_alternatives(body: &str) -> Option<Vec<&str>> {
    let bytes = body.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0usize;
    let mut escaped = false;
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if escaped {
            escaped = false;
            i += 1;
            continue;
        }
        match b {
            b'\\' => escaped = true,
            b'(' => return None,
            b'|' => {
                segments.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&body[start..]);
    Some(segments)
}

/// Decode a fully-literal escaped segment, refusing any unescaped
/// metacharacter (`.`, `*`, `+`, `?`, `[`, `]`, `{`, `}`, `^`, `$`).
fn unescape_literal(segment: &str) -> Option<String> {
    const METACHARS: &[char] = &['.', '*', '+', '?', '[', ']', '{', '}', '^', '$', '(', ')', '|'];
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => return None,
            }
        } else if METACHARS.contains(&c) {
            return None;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_safe_literal_alternation() {
        let c = classify("^(?:cat|dog|bird)$");
        match c {
            Classification::AnchoredSafe { literals: Some(lit) } => {
                assert_eq!(lit.alternatives, vec!["cat", "dog", "bird"]);
            }
            other => panic!("expected AnchoredSafe with literals, got {other:?}"),
        }
    }

    #[test]
    fn anchored_safe_without_literal_shape() {
        let c = classify("^[a-z]+$");
        assert!(matches!(
            c,
            Classification::AnchoredSafe { literals: None }
        ));
    }

    #[test]
    fn non_anchored_is_unsafe() {
        assert_eq!(classify("abc"), Classification::Unsafe);
    }

    #[test]
    fn partially_anchored_is_unsafe() {
        assert_eq!(classify("^abc"), Classification::Unsafe);
        assert_eq!(classify("abc$"), Classification::Unsafe);
    }

    #[test]
    fn oversized_pattern_is_complexity_capped() {
        let long = format!("^{}$", "a".repeat(5000));
        match classify(&long) {
            Classification::ComplexityCapped { reason } => {
                assert_eq!(reason, ComplexityCapReason::LengthExceeded);
            }
            other => panic!("expected ComplexityCapped, got {other:?}"),
        }
    }

    #[test]
    fn invalid_syntax_is_compile_error() {
        assert!(matches!(
            classify("(unclosed"),
            Classification::CompileError { .. }
        ));
    }

    #[test]
    fn lookaround_is_rejected_as_compile_error() {
        // This engine doesn't support lookaround syntax at all.
        assert!(matches!(
            classify("^(?=foo)bar$"),
            Classification::CompileError { .. }
        ));
    }

    #[test]
    fn backreference_is_rejected_as_compile_error() {
        assert!(matches!(
            classify(r"^(a)\1$"),
            Classification::CompileError { .. }
        ));
    }

    #[test]
    fn literal_alternation_with_escaped_metachars() {
        let c = classify(r"^(?:a\.b|c\$d)$");
        match c {
            Classification::AnchoredSafe { literals: Some(lit) } => {
                assert_eq!(lit.alternatives, vec!["a.b", "c$d"]);
            }
            other => panic!("expected literal alternation, got {other:?}"),
        }
    }

    #[test]
    fn empty_pattern_is_anchored_safe_single_empty_literal() {
        let c = classify("^(?:)$");
        match c {
            Classification::AnchoredSafe { literals: Some(lit) } => {
                assert_eq!(lit.alternatives, vec![""]);
            }
            other => panic!("expected empty literal alternation, got {other:?}"),
        }
    }
}
