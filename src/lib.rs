#![forbid(missing_docs)]
//! # `gridscan`
//! The `gridscan` crate is a library for incremental two-dimensional pattern
//! matching. Given a fixed alphabet of symbols and a catalogue of rectangular
//! patterns that may contain wildcards, it maintains, for every pattern, the
//! set of positions at which the pattern occurs in a mutable grid. After an
//! edit the work done is proportional to the edited area, the largest pattern
//! extent and the number of matches created or destroyed, never to the grid.
//! Counting the matches of a pattern and sampling a uniformly random match
//! are constant time.
//!
//! The engine compiles the catalogue into two deterministic finite automata
//! with the help of Thompson construction, subset construction and Hopcroft
//! minimisation: a row automaton over the symbol alphabet and a column
//! automaton over the row automaton's results. Rows are scanned right to
//! left and columns bottom to top, so every match is reported at its
//! top-left corner.

/// Module with the symbol alphabet.
mod alphabet;
pub use alphabet::Alphabet;

/// Module with error definitions.
mod errors;
pub use errors::{GridScanError, GridScanErrorKind, Result};

/// Module with the mutable symbol grid.
mod grid;
pub use grid::{Grid, GridListener};

/// The module with internal implementation details.
mod internal;

/// Module with the compiled pattern matcher.
mod matcher;
pub use matcher::PatternMatcher;

/// Module with the mutable matching state.
mod matcher_state;
pub use matcher_state::MatcherState;

/// Module with the rectangular pattern type.
mod pattern;
pub use pattern::Pattern;
