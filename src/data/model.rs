use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

// ---------------------------------------------------------------------------
// NumericBlock – a rectangular table of floats
// ---------------------------------------------------------------------------

/// Rows × columns of floats extracted from one section of a `.thf` file.
///
/// For MTF blocks the first column is the spatial frequency (lp/mm) and the
/// remaining columns are % MTF at successive defocus positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericBlock {
    rows: Vec<Vec<f64>>,
}

impl NumericBlock {
    /// Wrap rows that are already known to be rectangular.
    pub(crate) fn from_rows_unchecked(rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { rows }
    }

    /// Build a block, returning `None` when the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let rectangular = rows.windows(2).all(|w| w[0].len() == w[1].len());
        rectangular.then_some(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// `(rows, columns)`; an empty block is `(0, 0)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First value of every row.
    pub fn leading_column(&self) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.first().copied()).collect()
    }

    /// All values in row-major order.
    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().flatten().copied().collect()
    }

    /// Copy out the rows at `indices`, in the order given.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Element-wise `(a + b) / 2`. Both blocks must have the same shape.
    pub(crate) fn mean(a: &Self, b: &Self) -> Self {
        let rows = a
            .rows
            .iter()
            .zip(&b.rows)
            .map(|(ra, rb)| ra.iter().zip(rb).map(|(x, y)| (x + y) / 2.0).collect())
            .collect();
        Self { rows }
    }
}

// ---------------------------------------------------------------------------
// MeasurementFile – the three blocks of one .thf file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MeasurementFile {
    pub path: PathBuf,
    pub horizontal: NumericBlock,
    pub vertical: NumericBlock,
    /// Defocus positions in microns along z, flattened to one axis.
    pub defocus: Vec<f64>,
}

// ---------------------------------------------------------------------------
// FrequencySelection – which rows to keep
// ---------------------------------------------------------------------------

/// How a row's frequency is compared to the requested ones.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FrequencyMatch {
    /// Bit-for-bit equality after text-to-float parsing.
    #[default]
    Exact,
    /// `|row - requested| <= tolerance`.
    Within(f64),
}

impl FrequencyMatch {
    pub fn matches(self, row_freq: f64, wanted: f64) -> bool {
        match self {
            FrequencyMatch::Exact => row_freq == wanted,
            FrequencyMatch::Within(tol) => (row_freq - wanted).abs() <= tol,
        }
    }
}

/// Sorted, de-duplicated spatial frequencies requested by the user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencySelection {
    values: Vec<f64>,
    pub matching: FrequencyMatch,
}

impl FrequencySelection {
    /// Most frequencies a single run may request.
    pub const MAX_LEN: usize = 6;

    /// Sorts ascending and drops duplicates. Length is not checked here;
    /// [`crate::data::input::parse_frequencies`] enforces [`Self::MAX_LEN`].
    pub fn new(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        values.dedup();
        Self {
            values,
            matching: FrequencyMatch::Exact,
        }
    }

    pub fn with_matching(mut self, matching: FrequencyMatch) -> Self {
        self.matching = matching;
        self
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `freq` equals any requested frequency.
    pub fn contains(&self, freq: f64) -> bool {
        self.values.iter().any(|&w| self.matching.matches(freq, w))
    }
}

// ---------------------------------------------------------------------------
// AlignedTriple – horizontal / vertical / average at the selected rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedTriple {
    pub horizontal: NumericBlock,
    pub vertical: NumericBlock,
    pub average: NumericBlock,
}

impl AlignedTriple {
    /// Number of matched rows (identical for all three blocks).
    pub fn len(&self) -> usize {
        self.average.len()
    }

    pub fn is_empty(&self) -> bool {
        self.average.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Slice – which MTF orientation a curve or record represents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    Horizontal,
    Vertical,
    Average,
}

impl Slice {
    /// Short label used in record names and legends.
    pub fn label(self) -> &'static str {
        match self {
            Slice::Horizontal => "horz",
            Slice::Vertical => "vert",
            Slice::Average => "avg",
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FlatRecord – one labelled text row for export
// ---------------------------------------------------------------------------

/// `[label, value, value, ...]` – every field is already a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlatRecord(Vec<String>);

impl FlatRecord {
    pub fn new(label: String, values: impl IntoIterator<Item = String>) -> Self {
        let mut fields = vec![label];
        fields.extend(values);
        Self(fields)
    }

    pub fn label(&self) -> &str {
        &self.0[0]
    }

    /// The stringified numbers after the label.
    pub fn values(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Helpers shared by record and figure
// ---------------------------------------------------------------------------

/// File name with the 4-character extension (`.thf`) removed.
pub fn base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let keep = name.chars().count().saturating_sub(4);
    name.chars().take(keep).collect()
}

/// Integral values keep a trailing `.0` (`10.0`); everything else uses the
/// shortest representation that parses back to the same `f64`.
pub fn format_value(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}
