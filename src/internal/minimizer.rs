//! Hopcroft minimisation of a labelled DFA.
//!
//! The partition is seeded by splitting on each accept label's state set, so
//! two states end up in one block only if they carry identical accept sets.
//! The worklist loop then refines by preimages until no block splits. If the
//! partition ever reaches one block per state, the input was already minimal
//! and is returned unchanged.

use std::collections::BTreeMap;

use log::trace;

use super::{
    ids::{AcceptSetIDBase, StateIDBase},
    AcceptID, AcceptSetID, Dfa, IdMap, Partition, StateID,
};

/// Minimise `dfa`, preserving state 0 as the start state and keeping the
/// accept set table (and thus all accept set IDs) intact.
pub(crate) fn minimize(dfa: Dfa) -> Dfa {
    let n = dfa.state_count();
    let k = dfa.alphabet_size();

    // Inverse transition table: inverse[letter][target] = sources.
    let mut inverse: Vec<Vec<Vec<u32>>> = vec![vec![Vec::new(); n]; k];
    for state in 0..n {
        for letter in 0..k {
            let target = dfa.target(StateID::new(state as StateIDBase), letter);
            inverse[letter][target.as_usize()].push(state as u32);
        }
    }

    // Seed: split by the states carrying each accept label.
    let mut by_label: BTreeMap<AcceptID, Vec<u32>> = BTreeMap::new();
    for state in 0..n {
        for &label in dfa.accepts_at(StateID::new(state as StateIDBase)) {
            by_label.entry(label).or_default().push(state as u32);
        }
    }
    let mut partition = Partition::new(n);
    for set in by_label.values() {
        partition.refine(set);
    }

    while let Some(block) = partition.poll_unprocessed() {
        if partition.block_count() == n {
            trace!("minimisation shortcut: DFA with {} states is already minimal", n);
            return dfa;
        }
        for letter in 0..k {
            let preimage: Vec<u32> = block
                .iter()
                .flat_map(|&state| inverse[letter][state as usize].iter().copied())
                .collect();
            if !preimage.is_empty() {
                partition.refine(&preimage);
            }
        }
    }

    if partition.block_count() == n {
        trace!("minimisation shortcut: DFA with {} states is already minimal", n);
        return dfa;
    }

    build_quotient(&dfa, &partition)
}

/// Build the quotient DFA from the final partition. Block representatives are
/// interned in order, with the representative of state 0's block first so the
/// quotient's start state is 0; everything else is copied from each block's
/// representative with targets rewritten through the representative map.
fn build_quotient(dfa: &Dfa, partition: &Partition) -> Dfa {
    let n = dfa.state_count();
    let k = dfa.alphabet_size();

    let mut representatives: IdMap<u32> = IdMap::new();
    representatives.get_or_insert(partition.representative(0));
    for state in 0..n {
        representatives.get_or_insert(partition.representative(state as u32));
    }
    let m = representatives.len();
    debug_assert_eq!(m, partition.block_count());

    let mut transitions: Vec<StateID> = Vec::with_capacity(m * k);
    let mut accept_set_ids: Vec<AcceptSetID> = Vec::with_capacity(m);
    for id in 0..m {
        let representative = StateID::new(*representatives.by_id(id));
        for letter in 0..k {
            let target = dfa.target(representative, letter);
            let block_target = representatives
                .get(&partition.representative(target.id()))
                .expect("every block representative is interned");
            transitions.push(StateID::new(block_target as StateIDBase));
        }
        accept_set_ids.push(dfa.accept_set_id(representative));
    }

    let accept_sets = (0..dfa.accept_set_count())
        .map(|id| dfa.accept_set(AcceptSetID::new(id as AcceptSetIDBase)).to_vec())
        .collect();

    Dfa::from_parts(k, transitions, accept_set_ids, accept_sets)
}
