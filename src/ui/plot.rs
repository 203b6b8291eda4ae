use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{HLine, Legend, Line, LineStyle, Plot, PlotPoints, Points};

use thf_plot::data::model::Slice;
use thf_plot::figure::{Figure, Panel, X_AXIS_LABEL, Y_AXIS_LABEL, Y_RANGE};

use crate::color::CurvePalette;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Figure view (central panel)
// ---------------------------------------------------------------------------

/// Render the super-title and the grid of MTF panels.
pub fn figure_view(ui: &mut Ui, state: &AppState) {
    let figure = match &state.figure {
        Some(fig) => fig,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Choose a directory and frequencies, then press Run!");
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(&figure.super_title).strong().size(16.0));
    });
    ui.separator();

    if figure.panels.is_empty() {
        ui.label("No .thf files found in the selected directory.");
        return;
    }

    let palette = palette_for(figure).for_theme(ui.visuals().dark_mode);
    let rows = figure.layout.rows.max(1);
    let columns = figure.layout.columns.max(1);
    let spacing = ui.spacing().item_spacing;
    let cell_width = (ui.available_width() - spacing.x * (columns - 1) as f32) / columns as f32;
    let cell_height = (ui.available_height() - spacing.y * (rows - 1) as f32) / rows as f32;

    for (r, row_panels) in figure.panels.chunks(columns).enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            for (c, panel) in row_panels.iter().enumerate() {
                ui.vertical(|ui: &mut Ui| {
                    ui.set_width(cell_width);
                    panel_plot(
                        ui,
                        (r, c),
                        panel,
                        &figure.spec_lines,
                        &palette,
                        cell_height,
                    );
                });
            }
        });
    }
}

fn palette_for(figure: &Figure) -> CurvePalette {
    let n = figure
        .panels
        .iter()
        .flat_map(|p| &p.curves)
        .map(|c| c.color_index + 1)
        .max()
        .unwrap_or(0);
    CurvePalette::with_len(n)
}

fn panel_plot(
    ui: &mut Ui,
    id: (usize, usize),
    panel: &Panel,
    spec_lines: &[f64],
    palette: &CurvePalette,
    height: f32,
) {
    ui.label(RichText::new(&panel.title).strong());
    let title_height = ui.text_style_height(&eframe::egui::TextStyle::Body);

    Plot::new(("mtf_panel", id))
        .legend(Legend::default())
        .x_axis_label(X_AXIS_LABEL)
        .y_axis_label(Y_AXIS_LABEL)
        .include_y(Y_RANGE.0)
        .include_y(Y_RANGE.1)
        .height((height - title_height).max(120.0))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for curve in &panel.curves {
                let color = palette.color_for(curve.color_index);
                let style = match curve.slice {
                    Slice::Vertical => LineStyle::dotted_dense(),
                    Slice::Horizontal | Slice::Average => LineStyle::Solid,
                };

                let line = Line::new(PlotPoints::from(curve.points.clone()))
                    .name(&curve.label)
                    .color(color)
                    .style(style)
                    .width(1.0);
                plot_ui.line(line);

                let markers = Points::new(PlotPoints::from(curve.points.clone()))
                    .name(&curve.label)
                    .color(color)
                    .radius(2.0);
                plot_ui.points(markers);
            }

            for &y in spec_lines {
                plot_ui.hline(
                    HLine::new(y)
                        .color(Color32::GRAY)
                        .style(LineStyle::dotted_loose()),
                );
            }
        });
}
