//! Thompson construction of an NFA from a [Regex].
//!
//! Every node carries its epsilon edges, at most one input-consuming edge
//! (a letter set and a target), and the accept labels reached at that node.
//! The automaton is built back to front: each construction step receives the
//! node that follows it and returns its own entry node.

use super::{ids::StateIDBase, AcceptID, IntSet, Regex, StateID};

/// The input-consuming edge of an NFA node. It fires exactly when the current
/// letter lies in `letters`.
#[derive(Debug, Clone)]
pub(crate) struct Consume {
    pub(crate) letters: IntSet,
    pub(crate) next: StateID,
}

/// A node of the NFA.
#[derive(Debug, Clone, Default)]
pub(crate) struct NfaNode {
    epsilons: Vec<StateID>,
    consume: Option<Consume>,
    accepts: Vec<AcceptID>,
}

impl NfaNode {
    /// The epsilon successors of the node.
    pub(crate) fn epsilons(&self) -> &[StateID] {
        &self.epsilons
    }

    /// The input-consuming edge of the node, if any.
    pub(crate) fn consume(&self) -> Option<&Consume> {
        self.consume.as_ref()
    }

    /// The accept labels attached to the node.
    pub(crate) fn accepts(&self) -> &[AcceptID] {
        &self.accepts
    }
}

/// An NFA produced by Thompson construction.
#[derive(Debug, Clone)]
pub(crate) struct Nfa {
    alphabet_size: usize,
    nodes: Vec<NfaNode>,
    start: StateID,
}

impl Nfa {
    /// Build the NFA for `regex` over the letters `0..alphabet_size`.
    pub(crate) fn from_regex(alphabet_size: usize, regex: &Regex) -> Self {
        let mut nfa = Self {
            alphabet_size,
            nodes: Vec::new(),
            start: StateID::default(),
        };
        let out = nfa.new_node();
        nfa.start = nfa.build(regex, out);
        nfa
    }

    /// The designated start node.
    pub(crate) fn start(&self) -> StateID {
        self.start
    }

    /// The number of nodes.
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Access a node.
    pub(crate) fn node(&self, id: usize) -> &NfaNode {
        &self.nodes[id]
    }

    /// Close `set` under epsilon transitions in place.
    pub(crate) fn close(&self, set: &mut IntSet) {
        let mut pending: Vec<usize> = set.iter().collect();
        while let Some(id) = pending.pop() {
            for &target in self.nodes[id].epsilons() {
                if set.insert(target.as_usize()) {
                    pending.push(target.as_usize());
                }
            }
        }
    }

    fn new_node(&mut self) -> StateID {
        let id = StateID::new(self.nodes.len() as StateIDBase);
        self.nodes.push(NfaNode::default());
        id
    }

    /// Build the sub-automaton for `regex` so that leaving it continues at
    /// `out`. Returns the entry node.
    fn build(&mut self, regex: &Regex, out: StateID) -> StateID {
        match regex {
            Regex::Letters(letters) => {
                let entry = self.new_node();
                self.nodes[entry].consume = Some(Consume {
                    letters: letters.clone(),
                    next: out,
                });
                entry
            }
            Regex::Wildcard => {
                let entry = self.new_node();
                self.nodes[entry].consume = Some(Consume {
                    letters: IntSet::full(self.alphabet_size),
                    next: out,
                });
                entry
            }
            Regex::Concat(children) => {
                let mut target = out;
                for child in children.iter().rev() {
                    target = self.build(child, target);
                }
                target
            }
            Regex::Union(children) => {
                let entry = self.new_node();
                for child in children {
                    let join = self.new_node();
                    self.nodes[join].epsilons.push(out);
                    let child_entry = self.build(child, join);
                    self.nodes[entry].epsilons.push(child_entry);
                }
                entry
            }
            Regex::Star(child) => {
                let entry = self.new_node();
                let repeat = self.new_node();
                let child_entry = self.build(child, repeat);
                self.nodes[entry].epsilons.push(child_entry);
                self.nodes[entry].epsilons.push(out);
                self.nodes[repeat].epsilons.push(entry);
                entry
            }
            Regex::Accept(label) => {
                self.nodes[out].accepts.push(*label);
                out
            }
        }
    }
}
