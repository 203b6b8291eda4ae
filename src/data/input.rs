use super::error::ValidationError;
use super::model::FrequencySelection;

/// Plot rows used when the field is left blank.
pub const DEFAULT_PLOT_ROWS: usize = 2;

/// Parse the comma-separated frequency field.
///
/// The field must hold between one and [`FrequencySelection::MAX_LEN`]
/// entries. The count is taken before duplicates are removed.
pub fn parse_frequencies(input: &str) -> Result<FrequencySelection, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::NoFrequencies);
    }
    let values = parse_list(input, "Frequencies")?;
    if values.len() > FrequencySelection::MAX_LEN {
        return Err(ValidationError::TooManyFrequencies(values.len()));
    }
    Ok(FrequencySelection::new(values))
}

/// Parse the comma-separated spec-line field; blank means no lines.
pub fn parse_spec_lines(input: &str) -> Result<Vec<f64>, ValidationError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut lines = parse_list(input, "Spec lines")?;
    lines.sort_by(f64::total_cmp);
    Ok(lines)
}

/// Number of subplot rows for `n_files` panels.
///
/// Blank input means [`DEFAULT_PLOT_ROWS`]. The result never exceeds the
/// number of files, so a single file always gets one row. With no files
/// the requested value is returned unchanged.
pub fn plot_rows(input: &str, n_files: usize) -> Result<usize, ValidationError> {
    let trimmed = input.trim();
    let requested = if trimmed.is_empty() {
        DEFAULT_PLOT_ROWS
    } else {
        match trimmed.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => return Err(ValidationError::InvalidRows(trimmed.to_string())),
        }
    };
    Ok(match n_files {
        0 => requested,
        n => requested.min(n),
    })
}

/// `ceil(n_files / rows)`.
pub fn plot_columns(n_files: usize, rows: usize) -> usize {
    if rows == 0 {
        0
    } else {
        n_files.div_ceil(rows)
    }
}

fn parse_list(input: &str, field: &'static str) -> Result<Vec<f64>, ValidationError> {
    input
        .split(',')
        .map(|tok| {
            tok.trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidNumber {
                    field,
                    token: tok.trim().to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequencies_sorted() {
        let sel = parse_frequencies("104, 52,5").unwrap();
        assert_eq!(sel.values(), &[5.0, 52.0, 104.0]);
    }

    #[test]
    fn frequencies_required() {
        assert_eq!(parse_frequencies("  "), Err(ValidationError::NoFrequencies));
    }

    #[test]
    fn at_most_six_frequencies() {
        assert!(parse_frequencies("1,2,3,4,5,6").is_ok());
        assert_eq!(
            parse_frequencies("1,2,3,4,5,6,7"),
            Err(ValidationError::TooManyFrequencies(7))
        );
    }

    #[test]
    fn bad_frequency_token() {
        assert_eq!(
            parse_frequencies("10, ten"),
            Err(ValidationError::InvalidNumber {
                field: "Frequencies",
                token: "ten".into()
            })
        );
        // A trailing comma leaves an empty token.
        assert!(parse_frequencies("10,").is_err());
    }

    #[test]
    fn spec_lines() {
        assert_eq!(parse_spec_lines("").unwrap(), Vec::<f64>::new());
        assert_eq!(parse_spec_lines("75, 25,50").unwrap(), vec![25.0, 50.0, 75.0]);
    }

    #[test]
    fn rows_layout_rules() {
        assert_eq!(plot_rows("", 5), Ok(2));
        assert_eq!(plot_rows("", 1), Ok(1));
        assert_eq!(plot_rows("3", 1), Ok(1));
        assert_eq!(plot_rows("4", 3), Ok(3));
        assert_eq!(plot_rows("2", 7), Ok(2));
        assert_eq!(plot_rows("0", 3), Err(ValidationError::InvalidRows("0".into())));
        assert!(plot_rows("two", 3).is_err());
    }

    #[test]
    fn columns() {
        assert_eq!(plot_columns(5, 2), 3);
        assert_eq!(plot_columns(4, 2), 2);
        assert_eq!(plot_columns(0, 2), 0);
    }
}
