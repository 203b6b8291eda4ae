use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Parsing errors
// ---------------------------------------------------------------------------

/// A `.thf` file does not have the layout the block extractor expects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("{block} block: start marker {marker:?} not found")]
    MissingMarker {
        block: &'static str,
        marker: &'static str,
    },

    #[error("{block} block: no data rows between the markers")]
    EmptyBlock { block: &'static str },

    #[error("{block} block, line {line}: '{token}' is not a number")]
    NonNumeric {
        block: &'static str,
        line: usize,
        token: String,
    },

    #[error("{block} block, line {line}: expected {expected} columns, found {found}")]
    Ragged {
        block: &'static str,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("defocus block has {found} positions but MTF rows carry {expected} values")]
    DefocusLength { expected: usize, found: usize },
}

// ---------------------------------------------------------------------------
// Alignment errors
// ---------------------------------------------------------------------------

/// Horizontal and vertical blocks cannot be averaged row by row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeMismatchError {
    #[error("horizontal block is {h_rows}x{h_cols} but vertical block is {v_rows}x{v_cols}")]
    Shape {
        h_rows: usize,
        h_cols: usize,
        v_rows: usize,
        v_cols: usize,
    },

    #[error("row {row}: horizontal frequency {horizontal} differs from vertical frequency {vertical}")]
    FrequencyColumn {
        row: usize,
        horizontal: f64,
        vertical: f64,
    },
}

// ---------------------------------------------------------------------------
// Form input errors
// ---------------------------------------------------------------------------

/// User input rejected before any file is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please select a directory.")]
    NoDirectory,

    #[error("Please enter at least one frequency.")]
    NoFrequencies,

    #[error("Cannot use more than six spatial frequencies (got {0}).")]
    TooManyFrequencies(usize),

    #[error("{field}: '{token}' is not a number")]
    InvalidNumber { field: &'static str, token: String },

    #[error("Number of plot rows must be a positive integer, got '{0}'")]
    InvalidRows(String),
}

// ---------------------------------------------------------------------------
// Umbrella error for file-level operations
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ThfError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("{}: {source}", .path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: ShapeMismatchError,
    },

    #[error("directory {} is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Result type for file-level operations.
pub type Result<T> = std::result::Result<T, ThfError>;
