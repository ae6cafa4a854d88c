//! Module with the mutable matching state: a grid plus the per-cell automaton
//! states and per-pattern match indices that the engine keeps current across
//! edits.

use std::sync::Arc;

use rand::Rng;

use crate::{
    grid::GridListener,
    internal::{MatcherImpl, SampleableSet, StateID, StateVec},
    Grid, GridScanError, Pattern, Result,
};

/// A grid together with incrementally maintained match indices for every
/// catalogue pattern.
///
/// `row_states[x + w*y]` is the row DFA's state after reading row y right to
/// left down to column x; `col_states[x + w*y]` is the column DFA's state
/// after reading the row results of column x bottom to top up to row y.
/// Because both DFAs encode their patterns reversed, a pattern is matched
/// with its top-left corner at `(x, y)` exactly when the column DFA accepts
/// it there, and `match_indices` records those cells per pattern.
///
/// All edits go through this type so the indices can be repaired with
/// output-sensitive cost. The engine is single-threaded; `recompute` must run
/// to completion before the next edit.
pub struct MatcherState {
    matcher: Arc<MatcherImpl>,
    grid: Grid,
    row_states: StateVec,
    col_states: StateVec,
    match_indices: Vec<SampleableSet>,
}

impl MatcherState {
    /// Create a state for a `width` x `height` grid of symbol ID 0 and
    /// establish the match indices.
    pub(crate) fn new(matcher: Arc<MatcherImpl>, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GridScanError::invalid_state(format!(
                "grid dimensions {}x{} must be positive",
                width, height
            )));
        }
        debug_assert!(width * height <= u32::MAX as usize);
        let grid = Grid::new(width, height, matcher.alphabet().len());
        let row_states = StateVec::zeroed(matcher.row_dfa().state_count(), width * height);
        let col_states = StateVec::zeroed(matcher.col_dfa().state_count(), width * height);
        let match_indices = (0..matcher.pattern_count())
            .map(|_| SampleableSet::new())
            .collect();
        let mut state = Self {
            matcher,
            grid,
            row_states,
            col_states,
            match_indices,
        };
        state.recompute(0, 0, width, height)?;
        Ok(state)
    }

    /// Read access to the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The grid width.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// The grid height.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// The number of catalogue patterns.
    pub fn pattern_count(&self) -> usize {
        self.matcher.pattern_count()
    }

    /// Register a grid change listener. Listeners fire after the cells of an
    /// edit are written and before the match indices are updated, so they
    /// must not query matches.
    pub fn listen(&mut self, listener: impl FnMut(usize, usize, usize, usize) + 'static) {
        self.grid.listen(Box::new(listener) as GridListener);
    }

    /// Write `symbol` at `(x, y)`. Writing the value already present is a
    /// no-op; otherwise listeners fire and the affected matches are repaired.
    pub fn set(&mut self, x: usize, y: usize, symbol: usize) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(GridScanError::out_of_bounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        if symbol >= self.matcher.alphabet().len() {
            return Err(GridScanError::unknown_key(format!("symbol id {}", symbol)));
        }
        if self.grid.put(x, y, symbol) {
            self.grid.notify(x, y, x + 1, y + 1);
            self.recompute(x, y, x + 1, y + 1)?;
        }
        Ok(())
    }

    /// Stamp `pattern` with its origin at `(x, y)`: every non-wildcard cell
    /// is written, wildcards leave the grid untouched. Listeners receive the
    /// bounding box of the pattern's non-wildcard cells, which is then
    /// recomputed whether or not any cell actually changed value.
    pub fn set_pattern(&mut self, x: usize, y: usize, pattern: &Pattern) -> Result<()> {
        if x + pattern.width() > self.width() || y + pattern.height() > self.height() {
            return Err(GridScanError::out_of_bounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        for &(_, _, symbol) in pattern.payload() {
            if symbol >= self.matcher.alphabet().len() {
                return Err(GridScanError::unknown_key(format!("symbol id {}", symbol)));
            }
        }
        if pattern.payload().is_empty() {
            return Ok(());
        }
        for &(dx, dy, symbol) in pattern.payload() {
            self.grid.put(x + dx, y + dy, symbol);
        }
        let (min_x, min_y, max_x, max_y) = pattern.bounding_box();
        let rect = (x + min_x, y + min_y, x + max_x + 1, y + max_y + 1);
        self.grid.notify(rect.0, rect.1, rect.2, rect.3);
        self.recompute(rect.0, rect.1, rect.2, rect.3)
    }

    /// The number of positions where the pattern currently matches. O(1).
    pub fn count_matches(&self, pattern_id: usize) -> Result<usize> {
        Ok(self.indices(pattern_id)?.len())
    }

    /// A uniformly random position where the pattern currently matches, or
    /// None if it matches nowhere. O(1).
    pub fn random_match<R: Rng + ?Sized>(
        &self,
        pattern_id: usize,
        rng: &mut R,
    ) -> Result<Option<(usize, usize)>> {
        let width = self.width();
        Ok(self
            .indices(pattern_id)?
            .sample(rng)
            .map(|index| (index as usize % width, index as usize / width)))
    }

    /// All positions where the pattern currently matches, sorted row-major.
    pub fn match_positions(&self, pattern_id: usize) -> Result<Vec<(usize, usize)>> {
        let width = self.width();
        let mut indices: Vec<u32> = self.indices(pattern_id)?.iter().copied().collect();
        indices.sort_unstable();
        Ok(indices
            .into_iter()
            .map(|index| (index as usize % width, index as usize / width))
            .collect())
    }

    fn indices(&self, pattern_id: usize) -> Result<&SampleableSet> {
        self.match_indices
            .get(pattern_id)
            .ok_or_else(|| GridScanError::unknown_key(format!("pattern id {}", pattern_id)))
    }

    /// Re-establish the state arrays and match indices after the cells within
    /// the given half-open rectangle may have changed. Coordinates are
    /// clamped to the grid.
    ///
    /// Work stops as soon as the recomputed states re-synchronise with the
    /// memoised ones outside the rectangle, which bounds the cost by the
    /// edited area, the largest pattern extent, and the number of matches
    /// created or destroyed.
    pub fn recompute(
        &mut self,
        start_x: usize,
        start_y: usize,
        end_x: usize,
        end_y: usize,
    ) -> Result<()> {
        let matcher = Arc::clone(&self.matcher);
        let row_dfa = matcher.row_dfa();
        let col_dfa = matcher.col_dfa();
        let width = self.grid.width();
        let height = self.grid.height();
        let end_x = end_x.min(width);
        let start_x = start_x.min(end_x);
        let end_y = end_y.min(height);
        let start_y = start_y.min(end_y);

        // Phase 1: repair the row states leftwards from the rectangle's right
        // edge, tracking the leftmost column that actually changed.
        let mut min_changed_x = end_x;
        for y in start_y..end_y {
            let mut state = if end_x == width {
                StateID::new(0)
            } else {
                StateID::new(self.row_states.get(end_x + y * width))
            };
            let mut x = end_x;
            while x > 0 {
                x -= 1;
                let index = x + y * width;
                state = row_dfa.step(state, self.grid.cell(index))?;
                if self.row_states.get(index) != state.id() {
                    self.row_states.set(index, state.id());
                    if x < min_changed_x {
                        min_changed_x = x;
                    }
                } else if x < start_x {
                    // Re-synchronised with the memoised states left of the
                    // rectangle; nothing further can change.
                    break;
                }
            }
        }

        // Phase 2: repair the column states upwards for every affected
        // column, diffing accept sets into match index updates.
        for x in min_changed_x..end_x {
            let mut state = if end_y == height {
                StateID::new(0)
            } else {
                StateID::new(self.col_states.get(x + end_y * width))
            };
            let mut y = end_y;
            while y > 0 {
                y -= 1;
                let index = x + y * width;
                let letter = row_dfa
                    .accept_set_id(StateID::new(self.row_states.get(index)))
                    .as_usize();
                state = col_dfa.step(state, letter)?;
                let old = StateID::new(self.col_states.get(index));
                if state != old {
                    self.col_states.set(index, state.id());
                    let old_set = col_dfa.accept_set_id(old);
                    let new_set = col_dfa.accept_set_id(state);
                    for &broken in matcher.diff(old_set, new_set) {
                        self.match_indices[broken.as_usize()].remove(index as u32);
                    }
                    for &made in matcher.diff(new_set, old_set) {
                        self.match_indices[made.as_usize()].insert(index as u32);
                    }
                } else if y < start_y {
                    break;
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for MatcherState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcherState")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("patterns", &self.pattern_count())
            .finish()
    }
}
