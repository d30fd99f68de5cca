//! Determinization and product construction over byte-alphabet automata
//! (§4.2). Both stages enforce a per-construction state cap; breaching it is
//! the caller's signal to fall back to predicate-only coverage.

use std::collections::BTreeMap;

use super::nfa::{Edge, Nfa, NfaError};

/// A deterministic finite automaton over the byte alphabet.
#[derive(Debug, Clone)]
pub struct Dfa {
    pub states: Vec<DfaState>,
    pub start: usize,
}

/// One DFA state: a dense transition table plus whether it accepts.
#[derive(Debug, Clone)]
pub struct DfaState {
    pub transitions: Box<[Option<usize>; 256]>,
    pub accept: bool,
}

impl DfaState {
    fn empty(accept: bool) -> Self {
        Self {
            transitions: Box::new([None; 256]),
            accept,
        }
    }
}

/// Determinize `nfa` via subset construction, failing if the number of
/// distinct reachable subsets would exceed `max_states`.
///
/// # Errors
///
/// Returns [`NfaError::StateCapExceeded`] when the cap is breached.
pub fn determinize(nfa: &Nfa, max_states: usize) -> Result<Dfa, NfaError> {
    let start_set = nfa.epsilon_closure(&[nfa.start]);
    let mut index_of: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
    let mut states: Vec<DfaState> = Vec::new();
    let mut queue: Vec<Vec<usize>> = Vec::new();

    let start_accept = start_set.contains(&nfa.accept);
    index_of.insert(start_set.clone(), 0);
    states.push(DfaState::empty(start_accept));
    queue.push(start_set);

    while let Some(subset) = queue.pop() {
        let from_idx = index_of[&subset];
        for byte in 0u16..=255 {
            let byte = byte as u8;
            let mut moved: Vec<usize> = Vec::new();
            for &s in &subset {
                for edge in &nfa.states[s].edges {
                    if let Edge::Byte { ranges, target } = edge {
                        if ranges.iter().any(|&(lo, hi)| byte >= lo && byte <= hi) {
                            moved.push(*target);
                        }
                    }
                }
            }
            if moved.is_empty() {
                continue;
            }
            let closure = nfa.epsilon_closure(&moved);
            let target_idx = match index_of.get(&closure) {
                Some(&idx) => idx,
                None => {
                    if states.len() >= max_states {
                        return Err(NfaError::StateCapExceeded { limit: max_states });
                    }
                    let accept = closure.contains(&nfa.accept);
                    let idx = states.len();
                    states.push(DfaState::empty(accept));
                    index_of.insert(closure.clone(), idx);
                    queue.push(closure);
                    idx
                }
            };
            states[from_idx].transitions[byte as usize] = Some(target_idx);
        }
    }

    Ok(Dfa { states, start: 0 })
}

/// Build the product DFA accepting the intersection of `dfas`' languages,
/// failing if the number of distinct reachable tuples would exceed
/// `max_states`.
///
/// # Errors
///
/// Returns [`NfaError::StateCapExceeded`] when the cap is breached.
pub fn product(dfas: &[Dfa], max_states: usize) -> Result<Dfa, NfaError> {
    if dfas.is_empty() {
        return Ok(Dfa {
            states: vec![DfaState::empty(true)],
            start: 0,
        });
    }
    if dfas.len() == 1 {
        return Ok(dfas[0].clone());
    }

    let start_tuple: Vec<usize> = dfas.iter().map(|d| d.start).collect();
    let mut index_of: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
    let mut states: Vec<DfaState> = Vec::new();
    let mut queue: Vec<Vec<usize>> = Vec::new();

    let start_accept = tuple_accepts(dfas, &start_tuple);
    index_of.insert(start_tuple.clone(), 0);
    states.push(DfaState::empty(start_accept));
    queue.push(start_tuple);

    while let Some(tuple) = queue.pop() {
        let from_idx = index_of[&tuple];
        for byte in 0u16..=255 {
            let byte = byte as u8;
            let mut next_tuple = Vec::with_capacity(tuple.len());
            let mut dead = false;
            for (component, &state) in tuple.iter().enumerate() {
                match dfas[component].states[state].transitions[byte as usize] {
                    Some(next) => next_tuple.push(next),
                    None => {
                        dead = true;
                        break;
                    }
                }
            }
            if dead {
                continue;
            }
            let target_idx = match index_of.get(&next_tuple) {
                Some(&idx) => idx,
                None => {
                    if states.len() >= max_states {
                        return Err(NfaError::StateCapExceeded { limit: max_states });
                    }
                    let accept = tuple_accepts(dfas, &next_tuple);
                    let idx = states.len();
                    states.push(DfaState::empty(accept));
                    index_of.insert(next_tuple.clone(), idx);
                    queue.push(next_tuple);
                    idx
                }
            };
            states[from_idx].transitions[byte as usize] = Some(target_idx);
        }
    }

    Ok(Dfa { states, start: 0 })
}

fn tuple_accepts(dfas: &[Dfa], tuple: &[usize]) -> bool {
    dfas.iter()
        .zip(tuple.iter())
        .all(|(d, &s)| d.states[s].accept)
}
