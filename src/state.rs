use std::path::Path;

use anyhow::{bail, Result};
use thf_plot::data::export::write_records;
use thf_plot::figure::{build_figure, Figure, PlotRequest};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Form contents, edited in place by the side panel.
    pub request: PlotRequest,

    /// Maximise the window when a run succeeds.
    pub maximize_plot: bool,

    /// Last successful run (None until the user presses Run).
    pub figure: Option<Figure>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            request: PlotRequest::default(),
            maximize_plot: true,
            figure: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Validate the form and build a new figure. Returns `true` on success.
    pub fn run(&mut self) -> bool {
        match build_figure(&self.request) {
            Ok(figure) => {
                self.status_message = skipped_message(&figure);
                self.figure = Some(figure);
                true
            }
            Err(e) => {
                log::error!("Run failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                false
            }
        }
    }

    pub fn set_directory(&mut self, dir: &Path) {
        self.request.directory = dir.display().to_string();
    }

    /// Write the records of the current figure to `path`.
    pub fn export(&self, path: &Path) -> Result<()> {
        let Some(figure) = &self.figure else {
            bail!("Nothing to export: press Run first");
        };
        write_records(path, &figure.records)
    }
}

fn skipped_message(figure: &Figure) -> Option<String> {
    match figure.skipped.as_slice() {
        [] => None,
        [one] => Some(format!("Skipped {}", one.error)),
        many => Some(format!(
            "Skipped {} files (first: {})",
            many.len(),
            many[0].error
        )),
    }
}
