use thiserror::Error;

/// The result type for the `gridscan` crate.
pub type Result<T> = std::result::Result<T, GridScanError>;

/// The error type for the `gridscan` crate.
#[derive(Error, Debug)]
pub struct GridScanError {
    /// The source of the error.
    pub source: Box<GridScanErrorKind>,
}

impl GridScanError {
    /// Create a new `GridScanError`.
    pub fn new(kind: GridScanErrorKind) -> Self {
        GridScanError {
            source: Box::new(kind),
        }
    }

    /// Create an out-of-bounds error for the given coordinate and grid extent.
    pub(crate) fn out_of_bounds(x: usize, y: usize, width: usize, height: usize) -> Self {
        GridScanError::new(GridScanErrorKind::OutOfBounds {
            x,
            y,
            width,
            height,
        })
    }

    /// Create an unknown-key error.
    pub(crate) fn unknown_key(key: impl Into<String>) -> Self {
        GridScanError::new(GridScanErrorKind::UnknownKey(key.into()))
    }

    /// Create an invalid-state error.
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        GridScanError::new(GridScanErrorKind::InvalidState(message.into()))
    }

    /// Create a malformed-pattern error.
    pub(crate) fn malformed_pattern(message: impl Into<String>) -> Self {
        GridScanError::new(GridScanErrorKind::MalformedPattern(message.into()))
    }
}

impl std::fmt::Display for GridScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum GridScanErrorKind {
    /// A coordinate lies outside the grid. The failed operation left the engine unmodified.
    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The offending column.
        x: usize,
        /// The offending row.
        y: usize,
        /// The grid width.
        width: usize,
        /// The grid height.
        height: usize,
    },

    /// A symbol, row or pattern key is not present in the respective registry.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// A DFA was stepped with an out-of-range state or letter.
    #[error("invalid automaton input: {0}")]
    InvalidState(String),

    /// A pattern could not be parsed, e.g. because its rows differ in length.
    #[error("malformed pattern: {0}")]
    MalformedPattern(String),
}
