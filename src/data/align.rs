use super::error::ShapeMismatchError;
use super::model::{AlignedTriple, FrequencySelection, NumericBlock};

// ---------------------------------------------------------------------------
// Frequency alignment
// ---------------------------------------------------------------------------

/// Average the horizontal and vertical blocks and keep the rows whose
/// frequency is in `selection`.
///
/// * Both blocks must have the same shape and the same frequency column;
///   the leading column of the average therefore equals both inputs.
/// * Rows come out in block order, not in the order of `selection`.
/// * A row is kept once even if several requested frequencies match it,
///   and several rows may share one frequency.
/// * No match is not an error: all three blocks come back empty.
pub fn align(
    horizontal: &NumericBlock,
    vertical: &NumericBlock,
    selection: &FrequencySelection,
) -> Result<AlignedTriple, ShapeMismatchError> {
    check_aligned(horizontal, vertical)?;

    let average = NumericBlock::mean(horizontal, vertical);
    let indices = matching_rows(&average, selection);

    log::debug!(
        "matched {} of {} rows for frequencies {:?}",
        indices.len(),
        average.len(),
        selection.values()
    );

    Ok(AlignedTriple {
        horizontal: horizontal.select(&indices),
        vertical: vertical.select(&indices),
        average: average.select(&indices),
    })
}

/// Indices of rows whose leading value is in `selection`, ascending.
pub fn matching_rows(block: &NumericBlock, selection: &FrequencySelection) -> Vec<usize> {
    block
        .leading_column()
        .into_iter()
        .enumerate()
        .filter(|&(_, freq)| selection.contains(freq))
        .map(|(i, _)| i)
        .collect()
}

fn check_aligned(h: &NumericBlock, v: &NumericBlock) -> Result<(), ShapeMismatchError> {
    let (h_rows, h_cols) = h.shape();
    let (v_rows, v_cols) = v.shape();
    if (h_rows, h_cols) != (v_rows, v_cols) {
        return Err(ShapeMismatchError::Shape {
            h_rows,
            h_cols,
            v_rows,
            v_cols,
        });
    }

    let mismatch = h
        .leading_column()
        .into_iter()
        .zip(v.leading_column())
        .enumerate()
        .find(|&(_, (hf, vf))| hf != vf);
    match mismatch {
        Some((row, (horizontal, vertical))) => Err(ShapeMismatchError::FrequencyColumn {
            row,
            horizontal,
            vertical,
        }),
        None => Ok(()),
    }
}
