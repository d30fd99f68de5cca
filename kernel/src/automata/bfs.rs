//! Bounded BFS enumeration over a product DFA (§4.2).
//!
//! Yields accepting words in lexicographic order by the byte alphabet,
//! shortest length first -- the classic "expand each level in ascending
//! transition order" trick, which needs no explicit sort step.

use std::time::Instant;

use super::dfa::Dfa;

/// Limits governing a bounded enumeration.
#[derive(Debug, Clone, Copy)]
pub struct EnumerationLimits {
    pub max_results: usize,
    pub max_length: usize,
    pub max_candidates: usize,
}

/// Statistics recorded by a BFS run, for the diagnostic envelope.
#[derive(Debug, Clone, Default)]
pub struct BfsStats {
    pub nodes_expanded: usize,
    pub queue_peak: usize,
    pub elapsed_ms: u128,
    pub tried: usize,
    pub capped: bool,
}

/// Enumerate accepting words of `dfa` under `limits`. Returns the words (in
/// lexicographic, shortest-first order) and the run's [`BfsStats`].
#[must_use]
pub fn enumerate(dfa: &Dfa, limits: EnumerationLimits) -> (Vec<Vec<u8>>, BfsStats) {
    let started = Instant::now();
    let mut stats = BfsStats::default();
    let mut results: Vec<Vec<u8>> = Vec::new();

    if dfa.states[dfa.start].accept {
        results.push(Vec::new());
    }

    let mut queue: std::collections::VecDeque<(usize, Vec<u8>)> = std::collections::VecDeque::new();
    queue.push_back((dfa.start, Vec::new()));
    stats.queue_peak = queue.len();

    while let Some((state, word)) = queue.pop_front() {
        if results.len() >= limits.max_results {
            stats.capped = true;
            break;
        }
        if stats.tried >= limits.max_candidates {
            stats.capped = true;
            break;
        }
        if word.len() >= limits.max_length {
            continue;
        }
        stats.nodes_expanded += 1;
        for byte in 0u16..=255 {
            let byte = byte as u8;
            if let Some(next) = dfa.states[state].transitions[byte as usize] {
                stats.tried += 1;
                if stats.tried > limits.max_candidates {
                    stats.capped = true;
                    break;
                }
                let mut next_word = word.clone();
                next_word.push(byte);
                if dfa.states[next].accept {
                    if results.len() < limits.max_results {
                        results.push(next_word.clone());
                    } else {
                        stats.capped = true;
                        break;
                    }
                }
                if next_word.len() < limits.max_length {
                    queue.push_back((next, next_word));
                    stats.queue_peak = stats.queue_peak.max(queue.len());
                }
            }
        }
    }

    stats.elapsed_ms = started.elapsed().as_millis();
    (results, stats)
}
