use std::path::Path;

use super::model::{base_name, format_value, FlatRecord};

/// Tokens of the record label kept for the legend: `<slice> at <freq> lp/mm`.
const LEGEND_TOKENS: usize = 4;

/// Turn one MTF row (`[freq, mtf...]`) into a labelled text record.
///
/// Returns `(legend, record)` where `record[0]` reads
/// `"<basename> % MTF <slice> at <freq> lp/mm"` and the rest are the MTF
/// values as strings, in column order. `legend` is the last four words of
/// that label. An empty row gets a NaN frequency and no values.
pub fn flatten(path: &Path, slice_label: &str, row: &[f64]) -> (String, FlatRecord) {
    let (freq, values) = row.split_first().map_or((f64::NAN, &[][..]), |(f, v)| (*f, v));

    let label = format!(
        "{} % MTF {} at {} lp/mm",
        base_name(path),
        slice_label,
        format_value(freq)
    );
    let legend = legend_name(&label);
    let record = FlatRecord::new(label, values.iter().map(|&v| format_value(v)));

    (legend, record)
}

/// `["<basename> defocus (um)", positions...]`
pub fn defocus_record(path: &Path, defocus: &[f64]) -> FlatRecord {
    FlatRecord::new(
        format!("{} defocus (um)", base_name(path)),
        defocus.iter().map(|&v| format_value(v)),
    )
}

fn legend_name(label: &str) -> String {
    let words: Vec<&str> = label.split_whitespace().collect();
    words[words.len().saturating_sub(LEGEND_TOKENS)..].join(" ")
}
