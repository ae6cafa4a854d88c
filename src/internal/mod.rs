/// Module with the table-driven DFA and the subset construction.
mod dfa;
pub(crate) use dfa::Dfa;

/// Module with conversion of the automata to graphviz dot format.
#[cfg(feature = "dot_writer")]
pub(crate) mod dot;

/// Module with the insertion-ordered key interner.
mod id_map;
pub(crate) use id_map::IdMap;

/// Module for several ID types.
mod ids;
pub(crate) use ids::{AcceptID, AcceptSetID, StateID};

/// Module with the word-backed bit set.
mod int_set;
pub(crate) use int_set::IntSet;

/// Module with the matcher compilation pipeline.
pub(crate) mod matcher_impl;
pub(crate) use matcher_impl::MatcherImpl;

/// Module with Hopcroft DFA minimisation.
pub(crate) mod minimizer;

/// Module with the Thompson NFA construction.
mod nfa;
pub(crate) use nfa::Nfa;

/// Module with the partition refinement structure.
mod partition;
pub(crate) use partition::Partition;

/// Module with the regex abstract syntax.
mod regex;
pub(crate) use regex::Regex;

/// Module with the constant-time sampleable integer set.
mod sampleable_set;
pub(crate) use sampleable_set::SampleableSet;

/// Module with the width-minimal state arrays.
mod state_vec;
pub(crate) use state_vec::StateVec;
