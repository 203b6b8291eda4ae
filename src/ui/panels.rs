use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – run form
// ---------------------------------------------------------------------------

/// Render the form. Returns `true` when a run just succeeded.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) -> bool {
    ui.heading("Plot MTF");
    ui.label(
        RichText::new(
            "Plots every through-focus MTF file (.thf / .THF) in a directory \
             as a function of defocus position. Up to six spatial frequencies.",
        )
        .italics(),
    );
    ui.separator();

    // ---- Mandatory ----
    ui.strong("Mandatory fields");
    ui.label("Directory where the data is located");
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Browse…").clicked() {
            pick_directory(state);
        }
        ui.text_edit_singleline(&mut state.request.directory);
    });

    ui.label("Frequencies, separated by commas");
    ui.add(egui::TextEdit::singleline(&mut state.request.frequencies).hint_text("5, 10, 15"));
    ui.separator();

    // ---- Optional ----
    ui.strong("Optional fields");
    ui.label("Title of the plot");
    ui.text_edit_singleline(&mut state.request.title);

    ui.label("Spec lines, separated by commas");
    ui.add(egui::TextEdit::singleline(&mut state.request.spec_lines).hint_text("25, 50, 75"));

    ui.label("Number of rows on the plot");
    ui.add(egui::TextEdit::singleline(&mut state.request.plot_rows).hint_text("2"));

    ui.checkbox(
        &mut state.request.same_plot,
        "Plot all data on the same figure",
    );
    ui.checkbox(
        &mut state.request.plot_average,
        "Plot average MTF (default: separate horz and vert)",
    );
    ui.checkbox(&mut state.maximize_plot, "Maximize window after run");
    ui.separator();

    let mut ran = false;
    ui.vertical_centered(|ui: &mut Ui| {
        if ui.button(RichText::new("Run!").strong()).clicked() {
            ran = state.run();
        }
    });
    ran
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Choose directory…").clicked() {
                pick_directory(state);
                ui.close_menu();
            }
            let can_export = state.figure.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export records…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(fig) = &state.figure {
            ui.label(format!(
                "{} panels, {} records",
                fig.panels.len(),
                fig.records.len()
            ));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn pick_directory(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Select the directory with .thf files")
        .pick_folder();

    if let Some(dir) = dir {
        log::info!("Selected directory {}", dir.display());
        state.set_directory(&dir);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export MTF records")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .set_file_name("mtf_records.csv")
        .save_file();

    if let Some(path) = file {
        match state.export(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export records: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
