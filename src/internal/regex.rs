//! The regular expression abstract syntax over a dense symbol alphabet.
//! Row and column expressions are built programmatically by the matcher
//! compiler and never parsed from text.

use super::{ids::AcceptIDBase, AcceptID, IntSet};

/// A regular expression over the letters `0..alphabet_size`.
///
/// Accept nodes carry a dense accept label instead of consuming input, which
/// lets a single expression recognise many patterns simultaneously and report
/// which of them matched.
#[derive(Debug, Clone)]
pub(crate) enum Regex {
    /// Any single letter from the given set.
    Letters(IntSet),
    /// Any single letter of the alphabet.
    Wildcard,
    /// The children in sequence.
    Concat(Vec<Regex>),
    /// Any one of the children.
    Union(Vec<Regex>),
    /// Zero or more repetitions of the child.
    Star(Box<Regex>),
    /// Consumes nothing and tags the position with an accept label.
    Accept(AcceptID),
}

impl Regex {
    /// A single-letter expression.
    pub(crate) fn letter(symbol: usize, alphabet_size: usize) -> Regex {
        let mut set = IntSet::new(alphabet_size);
        set.insert(symbol);
        Regex::Letters(set)
    }

    /// An accept marker for the given dense label.
    pub(crate) fn accept(label: usize) -> Regex {
        Regex::Accept(AcceptID::new(label as AcceptIDBase))
    }
}
