use std::path::Path;

use super::error::{FormatError, Result, ThfError};
use super::model::{MeasurementFile, NumericBlock};

// ---------------------------------------------------------------------------
// Block descriptions
// ---------------------------------------------------------------------------

/// What stops a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEnd {
    /// A line equal to this marker after trimming.
    Marker(&'static str),
    /// The first blank line.
    BlankLine,
}

/// Rows removed after collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTrim {
    None,
    /// Drop the first and last collected rows. The horizontal section of
    /// the instrument's export is bracketed by two lines that are not data;
    /// this is a quirk of that one section, not a rule of the format.
    FirstAndLast,
}

/// One labelled section of a `.thf` file.
#[derive(Debug, Clone, Copy)]
pub struct BlockSpec {
    pub name: &'static str,
    pub start: &'static str,
    pub end: BlockEnd,
    pub trim: RowTrim,
}

pub const HORIZONTAL_MARKER: &str = "Horizontal Freq (lp/mm)  MTF @";
pub const VERTICAL_MARKER: &str = "Vertical Freq (lp/mm)  MTF @";
pub const INTENSITY_MARKER: &str = "Defocus Intensity Data: Horiz\tVert";
pub const DEFOCUS_MARKER: &str = "Defocus Position";

pub const HORIZONTAL: BlockSpec = BlockSpec {
    name: "horizontal MTF",
    start: HORIZONTAL_MARKER,
    end: BlockEnd::Marker(VERTICAL_MARKER),
    trim: RowTrim::FirstAndLast,
};

pub const VERTICAL: BlockSpec = BlockSpec {
    name: "vertical MTF",
    start: VERTICAL_MARKER,
    end: BlockEnd::Marker(INTENSITY_MARKER),
    trim: RowTrim::None,
};

pub const DEFOCUS: BlockSpec = BlockSpec {
    name: "defocus",
    start: DEFOCUS_MARKER,
    end: BlockEnd::BlankLine,
    trim: RowTrim::None,
};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read `path` and extract the block described by `spec`.
pub fn extract_block(path: &Path, spec: &BlockSpec) -> Result<NumericBlock> {
    let text = read_text(path)?;
    extract_block_from_str(&text, spec).map_err(|source| ThfError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// Read `path` once and extract all three blocks.
pub fn load_file(path: &Path) -> Result<MeasurementFile> {
    let text = read_text(path)?;
    parse_measurement(&text)
        .map(|(horizontal, vertical, defocus)| MeasurementFile {
            path: path.to_path_buf(),
            horizontal,
            vertical,
            defocus,
        })
        .map_err(|source| ThfError::Format {
            path: path.to_path_buf(),
            source,
        })
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ThfError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_measurement(
    text: &str,
) -> std::result::Result<(NumericBlock, NumericBlock, Vec<f64>), FormatError> {
    let horizontal = extract_block_from_str(text, &HORIZONTAL)?;
    let vertical = extract_block_from_str(text, &VERTICAL)?;
    let defocus = extract_block_from_str(text, &DEFOCUS)?.values();

    let expected = horizontal.shape().1.saturating_sub(1);
    if defocus.len() != expected {
        return Err(FormatError::DefocusLength {
            expected,
            found: defocus.len(),
        });
    }

    log::debug!(
        "parsed blocks: horizontal {:?}, vertical {:?}, {} defocus positions",
        horizontal.shape(),
        vertical.shape(),
        defocus.len()
    );
    Ok((horizontal, vertical, defocus))
}

// ---------------------------------------------------------------------------
// Marker scan
// ---------------------------------------------------------------------------

/// Single forward pass: idle until `spec.start`, copying until `spec.end`.
///
/// Marker lines are never copied. Copied lines are trimmed and split on
/// tabs; each token must parse as `f64` and every row must have the same
/// number of tokens. A new start marker while copying is a no-op, and
/// end-of-input in the copying state simply closes the block.
pub fn extract_block_from_str(
    text: &str,
    spec: &BlockSpec,
) -> std::result::Result<NumericBlock, FormatError> {
    let mut copying = false;
    let mut seen_start = false;
    let mut raw: Vec<(usize, &str)> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line == spec.start {
            copying = true;
            seen_start = true;
        } else if is_end(line, spec.end) {
            copying = false;
        } else if copying {
            raw.push((idx + 1, line));
        }
    }

    if !seen_start {
        return Err(FormatError::MissingMarker {
            block: spec.name,
            marker: spec.start,
        });
    }

    let raw: &[(usize, &str)] = match spec.trim {
        RowTrim::None => &raw[..],
        RowTrim::FirstAndLast if raw.len() >= 2 => &raw[1..raw.len() - 1],
        RowTrim::FirstAndLast => &[],
    };
    if raw.is_empty() {
        return Err(FormatError::EmptyBlock { block: spec.name });
    }

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(raw.len());
    for &(line_no, line) in raw {
        let row = parse_row(line, line_no, spec.name)?;
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(FormatError::Ragged {
                    block: spec.name,
                    line: line_no,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    Ok(NumericBlock::from_rows_unchecked(rows))
}

fn is_end(line: &str, end: BlockEnd) -> bool {
    match end {
        BlockEnd::Marker(marker) => line == marker,
        BlockEnd::BlankLine => line.is_empty(),
    }
}

fn parse_row(
    line: &str,
    line_no: usize,
    block: &'static str,
) -> std::result::Result<Vec<f64>, FormatError> {
    line.split('\t')
        .map(|tok| {
            tok.trim()
                .parse::<f64>()
                .map_err(|_| FormatError::NonNumeric {
                    block,
                    line: line_no,
                    token: tok.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    /// A minimal but complete `.thf` body with the given MTF rows
    /// (`[freq, v1, v2, ...]`) used for both horizontal and vertical data.
    pub(crate) fn thf_text(horz: &[&[f64]], vert: &[&[f64]], defocus: &[f64]) -> String {
        let row = |r: &[f64]| {
            r.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("\t")
        };
        let mut s = String::from("Through Focus MTF\nSample: lens 7\n\n");
        s.push_str(HORIZONTAL_MARKER);
        s.push('\n');
        s.push_str("\t-25\t25\n");
        for r in horz {
            s.push_str(&row(r));
            s.push('\n');
        }
        s.push('\n');
        s.push_str(VERTICAL_MARKER);
        s.push('\n');
        for r in vert {
            s.push_str(&row(r));
            s.push('\n');
        }
        s.push_str(INTENSITY_MARKER);
        s.push('\n');
        s.push_str("0.91\t0.88\n0.93\t0.90\n\n");
        s.push_str(DEFOCUS_MARKER);
        s.push('\n');
        s.push_str(&row(defocus));
        s.push_str("\n\nEnd of data\n");
        s
    }

    pub(crate) fn write_thf(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn horizontal_block_drops_bracketing_rows() {
        let text = thf_text(
            &[&[10.0, 50.0, 40.0], &[20.0, 30.0, 20.0]],
            &[&[10.0, 50.0, 40.0], &[20.0, 30.0, 20.0]],
            &[-25.0, 25.0],
        );
        // 4 raw lines between the markers: header, two data rows, blank.
        let block = extract_block_from_str(&text, &HORIZONTAL).unwrap();
        assert_eq!(block.shape(), (2, 3));
        assert_eq!(block.rows()[0], vec![10.0, 50.0, 40.0]);
        assert_eq!(block.rows()[1], vec![20.0, 30.0, 20.0]);
    }

    #[test]
    fn vertical_block_keeps_every_row() {
        let text = thf_text(
            &[&[10.0, 1.0]],
            &[&[10.0, 2.0], &[20.0, 3.0], &[30.0, 4.0]],
            &[0.0],
        );
        let block = extract_block_from_str(&text, &VERTICAL).unwrap();
        assert_eq!(block.leading_column(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn defocus_stops_at_blank_line() {
        let text = thf_text(&[&[10.0, 1.0, 2.0, 3.0]], &[&[10.0, 1.0, 2.0, 3.0]], &[-50.0, 0.0, 50.0]);
        let block = extract_block_from_str(&text, &DEFOCUS).unwrap();
        assert_eq!(block.values(), vec![-50.0, 0.0, 50.0]);
    }

    #[test]
    fn defocus_in_column_form() {
        let text = "Defocus Position\n-10\n0\n10\n\ntrailer\n";
        let block = extract_block_from_str(text, &DEFOCUS).unwrap();
        assert_eq!(block.shape(), (3, 1));
        assert_eq!(block.values(), vec![-10.0, 0.0, 10.0]);
    }

    #[test]
    fn markers_match_whole_trimmed_lines_only() {
        let text = "  Defocus Position  \n1\t2\n\nNot Defocus Position\n9\t9\n";
        let block = extract_block_from_str(text, &DEFOCUS).unwrap();
        assert_eq!(block.values(), vec![1.0, 2.0]);
    }

    #[test]
    fn missing_marker() {
        let err = extract_block_from_str("nothing here\n", &VERTICAL).unwrap_err();
        assert!(matches!(err, FormatError::MissingMarker { .. }));
    }

    #[test]
    fn empty_block() {
        let text = format!("{HORIZONTAL_MARKER}\n\n{VERTICAL_MARKER}\n");
        let err = extract_block_from_str(&text, &HORIZONTAL).unwrap_err();
        assert_eq!(err, FormatError::EmptyBlock { block: "horizontal MTF" });
    }

    #[test]
    fn non_numeric_token() {
        let text = format!("{VERTICAL_MARKER}\n10\tabc\n{INTENSITY_MARKER}\n");
        let err = extract_block_from_str(&text, &VERTICAL).unwrap_err();
        assert_eq!(
            err,
            FormatError::NonNumeric {
                block: "vertical MTF",
                line: 2,
                token: "abc".into()
            }
        );
    }

    #[test]
    fn ragged_rows() {
        let text = format!("{VERTICAL_MARKER}\n10\t1\t2\n20\t1\n{INTENSITY_MARKER}\n");
        let err = extract_block_from_str(&text, &VERTICAL).unwrap_err();
        assert!(matches!(err, FormatError::Ragged { expected: 3, found: 2, .. }));
    }

    #[test]
    fn load_file_reads_all_blocks() {
        let dir = TempDir::new().unwrap();
        let body = thf_text(
            &[&[10.0, 50.0, 40.0], &[20.0, 30.0, 20.0]],
            &[&[10.0, 52.0, 42.0], &[20.0, 32.0, 22.0]],
            &[-25.0, 25.0],
        );
        let path = write_thf(dir.path(), "sample.thf", &body);

        let file = load_file(&path).unwrap();
        assert_eq!(file.horizontal.shape(), (2, 3));
        assert_eq!(file.vertical.rows()[0], vec![10.0, 52.0, 42.0]);
        assert_eq!(file.defocus, vec![-25.0, 25.0]);
        assert_eq!(extract_block(&path, &VERTICAL).unwrap(), file.vertical);
    }

    #[test]
    fn load_file_checks_defocus_length() {
        let dir = TempDir::new().unwrap();
        let body = thf_text(&[&[10.0, 50.0, 40.0]], &[&[10.0, 50.0, 40.0]], &[0.0]);
        let path = write_thf(dir.path(), "bad.thf", &body);

        match load_file(&path) {
            Err(ThfError::Format { source, .. }) => {
                assert_eq!(source, FormatError::DefocusLength { expected: 2, found: 1 })
            }
            other => panic!("expected defocus length error, got {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("absent.thf")).unwrap_err();
        assert!(matches!(err, ThfError::Io { .. }));
    }
}
