//! The DFA implementation: subset construction over a Thompson NFA followed
//! by Hopcroft minimisation, executed from a dense transition table.
//!
//! A state does not merely accept or reject. It carries the set of accept
//! labels recognised there, interned to a dense accept set ID; the engine
//! uses those IDs both as the input alphabet of the column automaton and to
//! diff the matches between two states in output-sensitive time.

use log::trace;

use crate::{GridScanError, Result};

use super::{
    ids::{AcceptIDBase, AcceptSetIDBase, StateIDBase},
    minimizer, AcceptID, AcceptSetID, IdMap, IntSet, Nfa, Regex, StateID,
};

/// A table-driven DFA with labelled accept sets.
#[derive(Debug, Clone)]
pub(crate) struct Dfa {
    alphabet_size: usize,
    /// Row-major transition table: `transitions[state * alphabet_size + letter]`.
    transitions: Vec<StateID>,
    /// The accept set ID of each state.
    accept_set_ids: Vec<AcceptSetID>,
    /// The distinct accept sets observed across all states, in order of first
    /// appearance. Each entry is sorted ascending.
    accept_sets: Vec<Vec<AcceptID>>,
}

impl Dfa {
    /// Compile `regex` over the letters `0..alphabet_size` into a minimised
    /// DFA. `accept_count` is the number of distinct accept labels the
    /// expression can emit.
    pub(crate) fn from_regex(alphabet_size: usize, accept_count: usize, regex: &Regex) -> Self {
        let nfa = Nfa::from_regex(alphabet_size, regex);
        let dfa = Self::from_nfa(alphabet_size, accept_count, &nfa);
        trace!(
            "subset construction: {} NFA nodes -> {} DFA states, {} accept sets",
            nfa.node_count(),
            dfa.state_count(),
            dfa.accept_set_count()
        );
        let minimized = minimizer::minimize(dfa);
        trace!("minimisation: {} states", minimized.state_count());
        minimized
    }

    /// Subset construction. DFA states are epsilon-closed NFA node sets,
    /// interned by their canonical byte keys; the closure of the NFA start
    /// node becomes state 0.
    fn from_nfa(alphabet_size: usize, accept_count: usize, nfa: &Nfa) -> Self {
        let node_count = nfa.node_count();
        let mut subset_keys: IdMap<Vec<u8>> = IdMap::new();
        let mut subsets: Vec<IntSet> = Vec::new();

        let mut start = IntSet::new(node_count);
        start.insert(nfa.start().as_usize());
        nfa.close(&mut start);
        let start_id = subset_keys.get_or_insert(start.key());
        debug_assert_eq!(start_id, 0);
        subsets.push(start);

        let mut transitions: Vec<StateID> = Vec::new();
        let mut accept_keys: IdMap<Vec<u8>> = IdMap::new();
        let mut accept_sets: Vec<Vec<AcceptID>> = Vec::new();
        let mut accept_set_ids: Vec<AcceptSetID> = Vec::new();

        let mut unmarked = 0;
        while unmarked < subsets.len() {
            let current = subsets[unmarked].clone();
            for letter in 0..alphabet_size {
                let mut target = IntSet::new(node_count);
                for node in current.iter() {
                    if let Some(consume) = nfa.node(node).consume() {
                        if consume.letters.contains(letter) {
                            target.insert(consume.next.as_usize());
                        }
                    }
                }
                nfa.close(&mut target);
                let id = subset_keys.get_or_insert(target.key());
                if id == subsets.len() {
                    subsets.push(target);
                }
                transitions.push(StateID::new(id as StateIDBase));
            }

            let mut accepts = IntSet::new(accept_count);
            for node in current.iter() {
                for label in nfa.node(node).accepts() {
                    accepts.insert(label.as_usize());
                }
            }
            let id = accept_keys.get_or_insert(accepts.key());
            if id == accept_sets.len() {
                accept_sets.push(
                    accepts
                        .iter()
                        .map(|label| AcceptID::new(label as AcceptIDBase))
                        .collect(),
                );
            }
            accept_set_ids.push(AcceptSetID::new(id as AcceptSetIDBase));
            unmarked += 1;
        }

        Self {
            alphabet_size,
            transitions,
            accept_set_ids,
            accept_sets,
        }
    }

    /// Construct a DFA directly from its parts. Used by the minimiser to
    /// build the quotient automaton.
    pub(crate) fn from_parts(
        alphabet_size: usize,
        transitions: Vec<StateID>,
        accept_set_ids: Vec<AcceptSetID>,
        accept_sets: Vec<Vec<AcceptID>>,
    ) -> Self {
        debug_assert_eq!(transitions.len(), accept_set_ids.len() * alphabet_size);
        Self {
            alphabet_size,
            transitions,
            accept_set_ids,
            accept_sets,
        }
    }

    /// The size of the input alphabet.
    pub(crate) fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// The number of states.
    pub(crate) fn state_count(&self) -> usize {
        self.accept_set_ids.len()
    }

    /// The number of distinct accept sets.
    pub(crate) fn accept_set_count(&self) -> usize {
        self.accept_sets.len()
    }

    /// Execute one transition. Fails if `state` or `letter` is out of range.
    #[inline]
    pub(crate) fn step(&self, state: StateID, letter: usize) -> Result<StateID> {
        if state.as_usize() >= self.state_count() || letter >= self.alphabet_size {
            return Err(GridScanError::invalid_state(format!(
                "step({}, {}) on a DFA with {} states over {} letters",
                state,
                letter,
                self.state_count(),
                self.alphabet_size
            )));
        }
        Ok(self.transitions[state.as_usize() * self.alphabet_size + letter])
    }

    /// Execute one transition without range checks. The caller guarantees
    /// that `state` and `letter` are in range.
    #[inline]
    pub(crate) fn target(&self, state: StateID, letter: usize) -> StateID {
        debug_assert!(state.as_usize() < self.state_count());
        debug_assert!(letter < self.alphabet_size);
        self.transitions[state.as_usize() * self.alphabet_size + letter]
    }

    /// The accept set ID of `state`.
    #[inline]
    pub(crate) fn accept_set_id(&self, state: StateID) -> AcceptSetID {
        self.accept_set_ids[state.as_usize()]
    }

    /// The sorted accept labels of the interned accept set `id`.
    #[inline]
    pub(crate) fn accept_set(&self, id: AcceptSetID) -> &[AcceptID] {
        &self.accept_sets[id.as_usize()]
    }

    /// The sorted accept labels recognised at `state`.
    pub(crate) fn accepts_at(&self, state: StateID) -> &[AcceptID] {
        self.accept_set(self.accept_set_id(state))
    }

    /// Check whether `label` is accepted at `state`.
    /// It is used to validate the match indices in tests.
    #[allow(dead_code)]
    pub(crate) fn accepts(&self, state: StateID, label: AcceptID) -> bool {
        self.accepts_at(state).binary_search(&label).is_ok()
    }
}
