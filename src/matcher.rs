//! Module with the compiled pattern matcher.

use std::sync::Arc;

use crate::{internal::MatcherImpl, Alphabet, MatcherState, Pattern, Result};

/// An immutable pattern matcher compiled from an alphabet and a pattern
/// catalogue.
///
/// Compilation happens once, in [PatternMatcher::new]; afterwards the matcher
/// is a cheap handle that any number of [MatcherState] instances share. The
/// heavy lifting is two DFAs: one recognising the catalogue's rows within a
/// grid row, and one recognising whole patterns within a column of row
/// results.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pub(crate) inner: Arc<MatcherImpl>,
}

impl PatternMatcher {
    /// Compile `patterns` over `alphabet`.
    ///
    /// Patterns are deduplicated by their canonical keys; the order of first
    /// appearance assigns the pattern IDs used by all match queries.
    pub fn new(alphabet: Alphabet, patterns: Vec<Pattern>) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(MatcherImpl::try_new(alphabet, patterns)?),
        })
    }

    /// Create a fresh [MatcherState] with a `width` x `height` grid, every
    /// cell holding symbol ID 0 and all pattern matches materialised.
    pub fn make_state(&self, width: usize, height: usize) -> Result<MatcherState> {
        MatcherState::new(Arc::clone(&self.inner), width, height)
    }

    /// The alphabet the matcher was compiled for.
    pub fn alphabet(&self) -> &Alphabet {
        self.inner.alphabet()
    }

    /// The deduplicated pattern catalogue; positions are the pattern IDs.
    pub fn patterns(&self) -> &[Pattern] {
        self.inner.patterns()
    }

    /// The number of catalogue patterns.
    pub fn pattern_count(&self) -> usize {
        self.inner.pattern_count()
    }
}
