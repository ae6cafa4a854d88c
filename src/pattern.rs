//! Module with the rectangular pattern type and its operators.

use crate::{Alphabet, GridScanError, Result};

/// A rectangular raster of symbol IDs and wildcards.
///
/// The raster is kept redundantly as a row-major cell vector, as a write plan
/// listing the non-wildcard cells, and as a canonical key string used for
/// deduplication. Wildcard cells match any symbol and write nothing when the
/// pattern is stamped onto a grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawPattern", into = "RawPattern")
)]
pub struct Pattern {
    width: usize,
    height: usize,
    cells: Vec<Option<usize>>,
    payload: Vec<(usize, usize, usize)>,
    key: String,
}

impl Pattern {
    /// Parse the string form of a pattern: rows separated by `/`, one symbol
    /// character per cell, `*` for a wildcard.
    ///
    /// Fails if the rows differ in length, if a row is empty, or if a symbol
    /// is not part of `alphabet`.
    pub fn parse(text: &str, alphabet: &Alphabet) -> Result<Self> {
        let rows: Vec<&str> = text.split('/').collect();
        let width = rows[0].chars().count();
        if width == 0 {
            return Err(GridScanError::malformed_pattern(format!(
                "empty row in '{}'",
                text
            )));
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for row in &rows {
            if row.chars().count() != width {
                return Err(GridScanError::malformed_pattern(format!(
                    "rows of '{}' differ in length",
                    text
                )));
            }
            for symbol in row.chars() {
                if symbol == '*' {
                    cells.push(None);
                } else {
                    cells.push(Some(alphabet.index_of(symbol)?));
                }
            }
        }
        Self::from_cells(width, rows.len(), cells)
    }

    /// Create a pattern directly from a row-major cell vector; `None` marks a
    /// wildcard. Fails unless `cells.len() == width * height` with both
    /// dimensions positive.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Option<usize>>) -> Result<Self> {
        if width == 0 || height == 0 || cells.len() != width * height {
            return Err(GridScanError::malformed_pattern(format!(
                "{} cells do not form a {}x{} raster",
                cells.len(),
                width,
                height
            )));
        }
        let payload = cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|symbol| (i % width, i / width, symbol)))
            .collect();
        let key = Self::build_key(width, &cells);
        Ok(Self {
            width,
            height,
            cells,
            payload,
            key,
        })
    }

    fn build_key(width: usize, cells: &[Option<usize>]) -> String {
        let mut key = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                key.push(if i % width == 0 { '/' } else { ',' });
            }
            match cell {
                Some(symbol) => key.push_str(&symbol.to_string()),
                None => key.push('*'),
            }
        }
        key
    }

    /// The pattern width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The pattern height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The row-major raster; `None` is a wildcard.
    pub fn raster(&self) -> &[Option<usize>] {
        &self.cells
    }

    /// The write plan: one `(dx, dy, symbol)` triple per non-wildcard cell,
    /// in row-major order.
    pub fn payload(&self) -> &[(usize, usize, usize)] {
        &self.payload
    }

    /// The canonical key of the pattern. Two patterns are the same catalogue
    /// entry exactly when their keys are equal.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The inclusive bounding box `(min_x, min_y, max_x, max_y)` of the
    /// non-wildcard cells. A fully wildcarded pattern collapses to the single
    /// point (0, 0).
    pub fn bounding_box(&self) -> (usize, usize, usize, usize) {
        if self.payload.is_empty() {
            return (0, 0, 0, 0);
        }
        let mut bounds = (self.width, self.height, 0, 0);
        for &(x, y, _) in &self.payload {
            bounds.0 = bounds.0.min(x);
            bounds.1 = bounds.1.min(y);
            bounds.2 = bounds.2.max(x);
            bounds.3 = bounds.3.max(y);
        }
        bounds
    }

    /// Decompose the pattern into its rows, top to bottom, each a pattern of
    /// height one.
    pub fn rows(&self) -> Vec<Pattern> {
        (0..self.height)
            .map(|y| {
                let row = self.cells[y * self.width..(y + 1) * self.width].to_vec();
                Self::from_cells(self.width, 1, row).expect("a pattern row is a valid pattern")
            })
            .collect()
    }

    /// The pattern rotated 90 degrees clockwise.
    pub fn rotated(&self) -> Pattern {
        let mut cells = vec![None; self.cells.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                // (x, y) lands at (height - 1 - y, x) in the rotated raster.
                cells[(self.height - 1 - y) + x * self.height] = self.cells[x + y * self.width];
            }
        }
        Self::from_cells(self.height, self.width, cells)
            .expect("rotation preserves the cell count")
    }

    /// The pattern mirrored horizontally.
    pub fn reflected(&self) -> Pattern {
        let mut cells = vec![None; self.cells.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                cells[(self.width - 1 - x) + y * self.width] = self.cells[x + y * self.width];
            }
        }
        Self::from_cells(self.width, self.height, cells)
            .expect("reflection preserves the cell count")
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// The serialised form of a [Pattern]: just the raster, from which the write
/// plan and the key are rebuilt on deserialisation.
#[cfg(feature = "serde")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct RawPattern {
    width: usize,
    height: usize,
    cells: Vec<Option<usize>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPattern> for Pattern {
    type Error = GridScanError;

    fn try_from(raw: RawPattern) -> Result<Self> {
        Pattern::from_cells(raw.width, raw.height, raw.cells)
    }
}

#[cfg(feature = "serde")]
impl From<Pattern> for RawPattern {
    fn from(pattern: Pattern) -> Self {
        RawPattern {
            width: pattern.width,
            height: pattern.height,
            cells: pattern.cells,
        }
    }
}
