//! Thompson NFA construction over a byte alphabet, with a per-construction
//! state cap (§4.2).
//!
//! The parser accepts a practical subset of anchored regex bodies: literals
//! (with standard backslash escapes), character classes (`[a-z0-9_-]`,
//! negated with a leading `^`), grouping `(?:...)`, alternation `|`,
//! concatenation, and the quantifiers `*`, `+`, `?`, `{m}`, `{m,}`, `{m,n}`.
//! Lookaround and backreferences are rejected upstream by
//! [`crate::regex::classify`] and never reach this parser.

use std::fmt;

/// An error building an NFA from a pattern body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NfaError {
    /// The per-construction state budget was exceeded.
    StateCapExceeded { limit: usize },
    /// The body could not be parsed by the mini-regex grammar this
    /// automaton builder supports.
    Unsupported { message: String },
}

impl fmt::Display for NfaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateCapExceeded { limit } => write!(f, "NFA state cap exceeded (limit {limit})"),
            Self::Unsupported { message } => write!(f, "unsupported pattern body: {message}"),
        }
    }
}

impl std::error::Error for NfaError {}

/// An outbound edge from an NFA state.
#[derive(Debug, Clone)]
pub enum Edge {
    /// Consume one byte in `ranges` (inclusive, sorted, non-overlapping).
    Byte { ranges: Vec<(u8, u8)>, target: usize },
    /// Consume no input.
    Epsilon(usize),
}

/// One NFA state: its outbound edges.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub edges: Vec<Edge>,
}

/// A Thompson-constructed NFA over a byte alphabet.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: Vec<State>,
    pub start: usize,
    pub accept: usize,
}

impl Nfa {
    /// Epsilon-closure of a set of states, as a sorted `Vec`.
    #[must_use]
    pub fn epsilon_closure(&self, seeds: &[usize]) -> Vec<usize> {
        let mut stack: Vec<usize> = seeds.to_vec();
        let mut seen: std::collections::BTreeSet<usize> = seeds.iter().copied().collect();
        while let Some(s) = stack.pop() {
            for edge in &self.states[s].edges {
                if let Edge::Epsilon(t) = edge {
                    if seen.insert(*t) {
                        stack.push(*t);
                    }
                }
            }
        }
        seen.into_iter().collect()
    }
}

/// Build a Thompson NFA for `body` (the regex with its `^...$` anchors
/// already stripped), failing if the construction would exceed `max_states`.
///
/// # Errors
///
/// Returns [`NfaError::StateCapExceeded`] if the state budget is exhausted,
/// or [`NfaError::Unsupported`] if `body` uses syntax outside the supported
/// grammar.
pub fn build(body: &str, max_states: usize) -> Result<Nfa, NfaError> {
    let mut builder = Builder {
        states: Vec::new(),
        max_states,
    };
    let bytes: Vec<u8> = body.bytes().collect();
    let mut parser = Parser {
        input: &bytes,
        pos: 0,
        builder: &mut builder,
    };
    let frag = parser.parse_alt()?;
    if parser.pos != bytes.len() {
        return Err(NfaError::Unsupported {
            message: format!("trailing input at byte {}", parser.pos),
        });
    }
    Ok(Nfa {
        states: builder.states,
        start: frag.start,
        accept: frag.end,
    })
}

struct Fragment {
    start: usize,
    end: usize,
}

struct Builder {
    states: Vec<State>,
    max_states: usize,
}

impl Builder {
    fn new_state(&mut self) -> Result<usize, NfaError> {
        if self.states.len() >= self.max_states {
            return Err(NfaError::StateCapExceeded {
                limit: self.max_states,
            });
        }
        self.states.push(State::default());
        Ok(self.states.len() - 1)
    }

    fn add_epsilon(&mut self, from: usize, to: usize) {
        self.states[from].edges.push(Edge::Epsilon(to));
    }

    fn add_byte(&mut self, from: usize, ranges: Vec<(u8, u8)>, to: usize) {
        self.states[from].edges.push(Edge::Byte { ranges, target: to });
    }
}

struct Parser<'a, 'b> {
    input: &'a [u8],
    pos: usize,
    builder: &'b mut Builder,
}

impl<'a, 'b> Parser<'a, 'b> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn parse_alt(&mut self) -> Result<Fragment, NfaError> {
        let mut branches = vec![self.parse_concat()?];
        while self.peek() == Some(b'|') {
            self.pos += 1;
            branches.push(self.parse_concat()?);
        }
        if branches.len() == 1 {
            return Ok(branches.pop().unwrap());
        }
        let start = self.builder.new_state()?;
        let end = self.builder.new_state()?;
        for frag in branches {
            self.builder.add_epsilon(start, frag.start);
            self.builder.add_epsilon(frag.end, end);
        }
        Ok(Fragment { start, end })
    }

    fn parse_concat(&mut self) -> Result<Fragment, NfaError> {
        let mut frag: Option<Fragment> = None;
        while let Some(c) = self.peek() {
            if c == b'|' || c == b')' {
                break;
            }
            let next = self.parse_quantified()?;
            frag = Some(match frag {
                None => next,
                Some(prev) => {
                    self.builder.add_epsilon(prev.end, next.start);
                    Fragment {
                        start: prev.start,
                        end: next.end,
                    }
                }
            });
        }
        match frag {
            Some(f) => Ok(f),
            None => {
                // empty concat: epsilon fragment
                let start = self.builder.new_state()?;
                let end = self.builder.new_state()?;
                self.builder.add_epsilon(start, end);
                Ok(Fragment { start, end })
            }
        }
    }

    fn parse_quantified(&mut self) -> Result<Fragment, NfaError> {
        let atom_start = self.pos;
        let atom = self.parse_atom()?;
        let atom_src = &self.input[atom_start..self.pos];
        match self.peek() {
            Some(b'*') => {
                self.pos += 1;
                self.star(atom)
            }
            Some(b'+') => {
                self.pos += 1;
                self.plus(atom)
            }
            Some(b'?') => {
                self.pos += 1;
                self.optional(atom)
            }
            Some(b'{') => {
                let atom_src = atom_src.to_vec();
                self.parse_brace_quantifier(&atom_src)
            }
            _ => Ok(atom),
        }
    }

    fn star(&mut self, atom: Fragment) -> Result<Fragment, NfaError> {
        let start = self.builder.new_state()?;
        let end = self.builder.new_state()?;
        self.builder.add_epsilon(start, atom.start);
        self.builder.add_epsilon(start, end);
        self.builder.add_epsilon(atom.end, atom.start);
        self.builder.add_epsilon(atom.end, end);
        Ok(Fragment { start, end })
    }

    fn plus(&mut self, atom: Fragment) -> Result<Fragment, NfaError> {
        let end = self.builder.new_state()?;
        self.builder.add_epsilon(atom.end, atom.start);
        self.builder.add_epsilon(atom.end, end);
        Ok(Fragment {
            start: atom.start,
            end,
        })
    }

    fn optional(&mut self, atom: Fragment) -> Result<Fragment, NfaError> {
        let start = self.builder.new_state()?;
        let end = self.builder.new_state()?;
        self.builder.add_epsilon(start, atom.start);
        self.builder.add_epsilon(start, end);
        self.builder.add_epsilon(atom.end, end);
        Ok(Fragment { start, end })
    }

    /// `{m}`, `{m,}`, `{m,n}`: unrolled by re-parsing `atom_src` `m` (plus,
    /// for the open/bounded forms, additional optional/star copies) times.
    /// The builder's state cap bounds how far this can expand, so a pattern
    /// with a large bound naturally surfaces as [`NfaError::StateCapExceeded`].
    fn parse_brace_quantifier(&mut self, atom_src: &[u8]) -> Result<Fragment, NfaError> {
        self.pos += 1; // consume '{'
        let m = self.parse_number()?;
        let n = if self.peek() == Some(b',') {
            self.pos += 1;
            if self.peek() == Some(b'}') {
                None
            } else {
                Some(self.parse_number()?)
            }
        } else {
            Some(m)
        };
        if self.peek() != Some(b'}') {
            return Err(NfaError::Unsupported {
                message: "malformed brace quantifier".into(),
            });
        }
        self.pos += 1;

        fn build_copy(builder: &mut Builder, atom_src: &[u8]) -> Result<Fragment, NfaError> {
            let mut sub = Parser {
                input: atom_src,
                pos: 0,
                builder,
            };
            let frag = sub.parse_atom()?;
            if sub.pos != atom_src.len() {
                return Err(NfaError::Unsupported {
                    message: "quantified atom did not fully parse on re-expansion".into(),
                });
            }
            Ok(frag)
        }

        let mut required: Vec<Fragment> = Vec::new();
        for _ in 0..m {
            required.push(build_copy(self.builder, atom_src)?);
        }

        let mut frag = match required.len() {
            0 => {
                let start = self.builder.new_state()?;
                let end = self.builder.new_state()?;
                self.builder.add_epsilon(start, end);
                Fragment { start, end }
            }
            _ => {
                let mut iter = required.into_iter();
                let mut acc = iter.next().unwrap();
                for next in iter {
                    self.builder.add_epsilon(acc.end, next.start);
                    acc = Fragment {
                        start: acc.start,
                        end: next.end,
                    };
                }
                acc
            }
        };

        match n {
            None => {
                // `{m,}`: the last required copy becomes `copy+`.
                let tail = build_copy(self.builder, atom_src)?;
                let tail = self.star(tail)?;
                self.builder.add_epsilon(frag.end, tail.start);
                frag = Fragment {
                    start: frag.start,
                    end: tail.end,
                };
            }
            Some(n) if n > m => {
                for _ in 0..(n - m) {
                    let optional_copy = build_copy(self.builder, atom_src)?;
                    let optional_copy = self.optional(optional_copy)?;
                    self.builder.add_epsilon(frag.end, optional_copy.start);
                    frag = Fragment {
                        start: frag.start,
                        end: optional_copy.end,
                    };
                }
            }
            _ => {}
        }

        Ok(frag)
    }

    fn parse_number(&mut self) -> Result<u32, NfaError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(NfaError::Unsupported {
                message: "expected digits in quantifier".into(),
            });
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .unwrap()
            .parse()
            .map_err(|_| NfaError::Unsupported {
                message: "quantifier bound overflow".into(),
            })
    }

    fn parse_atom(&mut self) -> Result<Fragment, NfaError> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                if self.input.get(self.pos..self.pos + 2) == Some(b"?:") {
                    self.pos += 2;
                }
                let frag = self.parse_alt()?;
                if self.peek() != Some(b')') {
                    return Err(NfaError::Unsupported {
                        message: "unterminated group".into(),
                    });
                }
                self.pos += 1;
                Ok(frag)
            }
            Some(b'[') => self.parse_class(),
            Some(b'.') => {
                self.pos += 1;
                self.byte_fragment(vec![(0, 255)])
            }
            Some(b'\\') => {
                self.pos += 1;
                let escaped = self.bump().ok_or_else(|| NfaError::Unsupported {
                    message: "trailing backslash".into(),
                })?;
                self.byte_fragment(vec![(escaped, escaped)])
            }
            Some(c) if c.is_ascii() && !matches!(c, b'*' | b'+' | b'?' | b')' | b'|' | b'}') => {
                self.pos += 1;
                self.byte_fragment(vec![(c, c)])
            }
            Some(c) => Err(NfaError::Unsupported {
                message: format!("unexpected byte 0x{c:02x} at position {}", self.pos),
            }),
            None => Err(NfaError::Unsupported {
                message: "unexpected end of pattern".into(),
            }),
        }
    }

    fn byte_fragment(&mut self, ranges: Vec<(u8, u8)>) -> Result<Fragment, NfaError> {
        let start = self.builder.new_state()?;
        let end = self.builder.new_state()?;
        self.builder.add_byte(start, ranges, end);
        Ok(Fragment { start, end })
    }

    fn parse_class(&mut self) -> Result<Fragment, NfaError> {
        self.pos += 1; // consume '['
        let negated = self.peek() == Some(b'^');
        if negated {
            self.pos += 1;
        }
        let mut ranges: Vec<(u8, u8)> = Vec::new();
        while let Some(c) = self.peek() {
            if c == b']' {
                break;
            }
            let lo = if c == b'\\' {
                self.pos += 1;
                self.bump().ok_or_else(|| NfaError::Unsupported {
                    message: "trailing backslash in class".into(),
                })?
            } else {
                self.pos += 1;
                c
            };
            if self.peek() == Some(b'-') && self.input.get(self.pos + 1) != Some(&b']') {
                self.pos += 1;
                let hi = match self.peek() {
                    Some(b'\\') => {
                        self.pos += 1;
                        self.bump().ok_or_else(|| NfaError::Unsupported {
                            message: "trailing backslash in class range".into(),
                        })?
                    }
                    Some(h) => {
                        self.pos += 1;
                        h
                    }
                    None => {
                        return Err(NfaError::Unsupported {
                            message: "unterminated class range".into(),
                        })
                    }
                };
                ranges.push((lo, hi));
            } else {
                ranges.push((lo, lo));
            }
        }
        if self.peek() != Some(b']') {
            return Err(NfaError::Unsupported {
                message: "unterminated character class".into(),
            });
        }
        self.pos += 1;
        ranges.sort_unstable();
        let ranges = if negated { negate_ranges(&ranges) } else { merge_ranges(ranges) };
        self.byte_fragment(ranges)
    }
}

fn merge_ranges(mut ranges: Vec<(u8, u8)>) -> Vec<(u8, u8)> {
    ranges.sort_unstable();
    let mut merged: Vec<(u8, u8)> = Vec::new();
    for (lo, hi) in ranges {
        if let Some(last) = merged.last_mut() {
            if lo as u32 <= last.1 as u32 + 1 {
                last.1 = last.1.max(hi);
                continue;
            }
        }
        merged.push((lo, hi));
    }
    merged
}

fn negate_ranges(ranges: &[(u8, u8)]) -> Vec<(u8, u8)> {
    let merged = merge_ranges(ranges.to_vec());
    let mut out = Vec::new();
    let mut next_lo: u32 = 0;
    for &(lo, hi) in &merged {
        if (lo as u32) > next_lo {
            out.push((next_lo as u8, (lo as u32 - 1) as u8));
        }
        next_lo = hi as u32 + 1;
    }
    if next_lo <= 255 {
        out.push((next_lo as u8, 255));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_concatenation_builds() {
        let nfa = build("abc", 64).unwrap();
        assert!(nfa.states.len() >= 2);
    }

    #[test]
    fn alternation_builds() {
        let nfa = build("cat|dog", 64).unwrap();
        assert!(!nfa.states.is_empty());
    }

    #[test]
    fn star_and_plus_build() {
        assert!(build("a*b+c?", 64).is_ok());
    }

    #[test]
    fn character_class_builds() {
        assert!(build("[a-z0-9_]+", 64).is_ok());
    }

    #[test]
    fn negated_class_builds() {
        let nfa = build("[^a-z]", 64).unwrap();
        let start_edges = &nfa.states[nfa.start].edges;
        assert!(!start_edges.is_empty());
    }

    #[test]
    fn state_cap_is_enforced() {
        let long = "a".repeat(200);
        assert!(matches!(
            build(&long, 10),
            Err(NfaError::StateCapExceeded { .. })
        ));
    }

    #[test]
    fn unterminated_group_is_unsupported() {
        assert!(matches!(
            build("(abc", 64),
            Err(NfaError::Unsupported { .. })
        ));
    }

    #[test]
    fn brace_quantifier_exact_count_builds() {
        assert!(build("a{3}", 64).is_ok());
    }

    #[test]
    fn brace_quantifier_open_range_builds() {
        assert!(build("a{2,}", 64).is_ok());
    }

    #[test]
    fn brace_quantifier_bounded_range_builds() {
        assert!(build("a{2,4}", 64).is_ok());
    }

    #[test]
    fn brace_quantifier_on_group_builds() {
        assert!(build("(?:ab){2,3}", 64).is_ok());
    }

    #[test]
    fn epsilon_closure_follows_epsilon_chains() {
        let nfa = build("a?b", 64).unwrap();
        let closure = nfa.epsilon_closure(&[nfa.start]);
        assert!(closure.contains(&nfa.start));
    }
}
