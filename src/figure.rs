use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::data::align::align;
use crate::data::collect::collect;
use crate::data::error::{ThfError, ValidationError};
use crate::data::input::{parse_frequencies, parse_spec_lines, plot_columns, plot_rows};
use crate::data::loader::load_file;
use crate::data::model::{FlatRecord, FrequencyMatch, FrequencySelection, MeasurementFile, Slice};
use crate::data::record::{defocus_record, flatten};
use crate::timing::Stopwatch;

pub const X_AXIS_LABEL: &str = "defocus position (um)";
pub const Y_AXIS_LABEL: &str = "% MTF";
/// % MTF axis is always shown over this range.
pub const Y_RANGE: (f64, f64) = (0.0, 100.0);

// ---------------------------------------------------------------------------
// Request – the form contents
// ---------------------------------------------------------------------------

/// Everything the front end collects before a run. Text fields are kept
/// raw and validated by [`build_figure`].
#[derive(Debug, Clone, Default)]
pub struct PlotRequest {
    pub directory: String,
    pub plot_rows: String,
    pub title: String,
    pub frequencies: String,
    pub spec_lines: String,
    /// Plot the horizontal/vertical average instead of both orientations.
    pub plot_average: bool,
    /// Overlay every file on one panel instead of one panel per file.
    pub same_plot: bool,
    pub matching: FrequencyMatch,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Collect(#[from] ThfError),
}

// ---------------------------------------------------------------------------
// Figure – plain values the front end draws
// ---------------------------------------------------------------------------

/// One MTF-vs-defocus line.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub label: String,
    pub slice: Slice,
    /// Index of the matched frequency row; the front end maps it to a colour.
    pub color_index: usize,
    /// `[defocus, mtf]` pairs.
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub curves: Vec<Curve>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub rows: usize,
    pub columns: usize,
}

/// A file left out of the figure.
#[derive(Debug)]
pub struct Skipped {
    pub path: PathBuf,
    pub error: ThfError,
}

#[derive(Debug)]
pub struct Figure {
    pub super_title: String,
    pub layout: Layout,
    pub panels: Vec<Panel>,
    /// Horizontal spec lines, ascending, drawn on every panel.
    pub spec_lines: Vec<f64>,
    /// Defocus record then one record per plotted slice, file by file.
    pub records: Vec<FlatRecord>,
    pub skipped: Vec<Skipped>,
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Validate `request`, load every `.thf` file under its directory and lay
/// the curves out as panels.
///
/// A file that fails to parse or align is logged, listed in
/// [`Figure::skipped`] and left out; the rest of the batch still runs.
pub fn build_figure(request: &PlotRequest) -> Result<Figure, RunError> {
    let directory = request.directory.trim();
    if directory.is_empty() {
        return Err(ValidationError::NoDirectory.into());
    }
    let selection = parse_frequencies(&request.frequencies)?.with_matching(request.matching);
    let spec_lines = parse_spec_lines(&request.spec_lines)?;
    // Checked once up front so a bad value is reported before any I/O.
    plot_rows(&request.plot_rows, 0)?;

    let directory = Path::new(directory);
    let stopwatch = Stopwatch::start();
    let paths = collect(directory)?;

    let mut panels = Vec::new();
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for path in &paths {
        match file_curves(path, &selection, request.plot_average) {
            Ok((curves, file_records)) => {
                records.extend(file_records);
                panels.push(Panel {
                    title: file_title(path),
                    curves,
                });
            }
            Err(error) => {
                log::warn!("skipping {}: {error}", path.display());
                skipped.push(Skipped {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    let (panels, layout) = if request.same_plot {
        let title = if request.plot_average {
            "Average % MTF of overlapping corridors"
        } else {
            "Horz and vert % MTF of overlapping corridors"
        };
        let curves = panels.into_iter().flat_map(|p| p.curves).collect();
        let overlay = Panel {
            title: title.to_string(),
            curves,
        };
        (vec![overlay], Layout { rows: 1, columns: 1 })
    } else {
        let rows = plot_rows(&request.plot_rows, panels.len())?;
        let columns = plot_columns(panels.len(), rows);
        (panels, Layout { rows, columns })
    };

    log::info!(
        "plotted {} files ({} skipped) in {}",
        paths.len() - skipped.len(),
        skipped.len(),
        stopwatch.report()
    );

    Ok(Figure {
        super_title: super_title(
            &request.title,
            directory,
            chrono::Local::now().date_naive(),
        ),
        layout,
        panels,
        spec_lines,
        records,
        skipped,
    })
}

/// Curves and export records for one file.
pub fn file_curves(
    path: &Path,
    selection: &FrequencySelection,
    plot_average: bool,
) -> Result<(Vec<Curve>, Vec<FlatRecord>), ThfError> {
    let file = load_file(path)?;
    curves_for(&file, selection, plot_average)
}

fn curves_for(
    file: &MeasurementFile,
    selection: &FrequencySelection,
    plot_average: bool,
) -> Result<(Vec<Curve>, Vec<FlatRecord>), ThfError> {
    let aligned =
        align(&file.horizontal, &file.vertical, selection).map_err(|source| ThfError::Shape {
            path: file.path.clone(),
            source,
        })?;

    let mut records = vec![defocus_record(&file.path, &file.defocus)];
    let mut curves = Vec::new();

    let slices: &[Slice] = if plot_average {
        &[Slice::Average]
    } else {
        &[Slice::Horizontal, Slice::Vertical]
    };

    for n in 0..aligned.len() {
        for &slice in slices {
            let block = match slice {
                Slice::Horizontal => &aligned.horizontal,
                Slice::Vertical => &aligned.vertical,
                Slice::Average => &aligned.average,
            };
            let row = &block.rows()[n];
            let (label, record) = flatten(&file.path, slice.label(), row);
            records.push(record);

            let points = file
                .defocus
                .iter()
                .zip(row.iter().skip(1))
                .map(|(&z, &mtf)| [z, mtf])
                .collect();
            curves.push(Curve {
                label,
                slice,
                color_index: n,
                points,
            });
        }
    }

    Ok((curves, records))
}

/// `"<title>\n<directory>\n<Month DD, YYYY>"`
pub fn super_title(title: &str, directory: &Path, date: NaiveDate) -> String {
    format!(
        "{title}\n{}\n{}",
        directory.display(),
        date.format("%B %d, %Y")
    )
}

fn file_title(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::{thf_text, write_thf};
    use tempfile::TempDir;

    fn request(dir: &Path) -> PlotRequest {
        PlotRequest {
            directory: dir.display().to_string(),
            frequencies: "10".into(),
            ..Default::default()
        }
    }

    fn sample_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let body = thf_text(
            &[&[10.0, 50.0, 40.0], &[20.0, 30.0, 20.0]],
            &[&[10.0, 50.0, 40.0], &[20.0, 30.0, 20.0]],
            &[-25.0, 25.0],
        );
        for name in names {
            write_thf(dir.path(), name, &body);
        }
        dir
    }

    #[test]
    fn average_records_end_to_end() {
        let dir = sample_dir(&["sample.thf"]);
        let req = PlotRequest {
            plot_average: true,
            ..request(dir.path())
        };
        let fig = build_figure(&req).unwrap();

        assert_eq!(fig.layout, Layout { rows: 1, columns: 1 });
        assert_eq!(fig.panels.len(), 1);
        assert_eq!(fig.panels[0].title, "sample.thf");

        let curve = &fig.panels[0].curves[0];
        assert_eq!(curve.label, "avg at 10.0 lp/mm");
        assert_eq!(curve.points, vec![[-25.0, 50.0], [25.0, 40.0]]);

        assert_eq!(fig.records.len(), 2);
        assert_eq!(fig.records[0].fields(), &["sample defocus (um)", "-25.0", "25.0"]);
        assert_eq!(
            fig.records[1].fields(),
            &["sample % MTF avg at 10.0 lp/mm", "50.0", "40.0"]
        );
    }

    #[test]
    fn horizontal_and_vertical_curves() {
        let dir = sample_dir(&["a.thf"]);
        let req = PlotRequest {
            frequencies: "20, 10".into(),
            ..request(dir.path())
        };
        let fig = build_figure(&req).unwrap();
        let slices: Vec<(Slice, usize)> = fig.panels[0]
            .curves
            .iter()
            .map(|c| (c.slice, c.color_index))
            .collect();
        assert_eq!(
            slices,
            vec![
                (Slice::Horizontal, 0),
                (Slice::Vertical, 0),
                (Slice::Horizontal, 1),
                (Slice::Vertical, 1)
            ]
        );
        // defocus + 4 slices
        assert_eq!(fig.records.len(), 5);
    }

    #[test]
    fn grid_layout_and_overlay() {
        let dir = sample_dir(&["a.thf", "b.thf", "c.THF"]);
        let fig = build_figure(&request(dir.path())).unwrap();
        assert_eq!(fig.layout, Layout { rows: 2, columns: 2 });
        assert_eq!(fig.panels.len(), 3);

        let overlay = PlotRequest {
            same_plot: true,
            plot_average: true,
            ..request(dir.path())
        };
        let fig = build_figure(&overlay).unwrap();
        assert_eq!(fig.panels.len(), 1);
        assert_eq!(fig.panels[0].title, "Average % MTF of overlapping corridors");
        assert_eq!(fig.panels[0].curves.len(), 3);
    }

    #[test]
    fn bad_file_is_skipped() {
        let dir = sample_dir(&["good.thf"]);
        write_thf(dir.path(), "broken.thf", "no markers at all\n");

        let fig = build_figure(&request(dir.path())).unwrap();
        assert_eq!(fig.panels.len(), 1);
        assert_eq!(fig.skipped.len(), 1);
        assert!(fig.skipped[0].path.ends_with("broken.thf"));
        assert!(matches!(fig.skipped[0].error, ThfError::Format { .. }));
    }

    #[test]
    fn unmatched_frequency_gives_empty_panel() {
        let dir = sample_dir(&["a.thf"]);
        let req = PlotRequest {
            frequencies: "15".into(),
            ..request(dir.path())
        };
        let fig = build_figure(&req).unwrap();
        assert!(fig.panels[0].curves.is_empty());
        assert_eq!(fig.records.len(), 1);
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let fig = build_figure(&request(dir.path())).unwrap();
        assert!(fig.panels.is_empty());
        assert_eq!(fig.layout.columns, 0);
    }

    #[test]
    fn validation_before_io() {
        let err = build_figure(&PlotRequest::default()).unwrap_err();
        assert!(matches!(err, RunError::Validation(ValidationError::NoDirectory)));

        let req = PlotRequest {
            directory: "/does/not/matter".into(),
            frequencies: "1,2,3,4,5,6,7".into(),
            ..Default::default()
        };
        let err = build_figure(&req).unwrap_err();
        assert!(matches!(
            err,
            RunError::Validation(ValidationError::TooManyFrequencies(7))
        ));
    }

    #[test]
    fn super_title_format() {
        let date = NaiveDate::from_ymd_opt(2015, 9, 2).unwrap();
        assert_eq!(
            super_title("Lens 7", Path::new("/data/run"), date),
            "Lens 7\n/data/run\nSeptember 02, 2015"
        );
    }
}
