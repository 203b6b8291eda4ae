use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct PlotMtfApp {
    pub state: AppState,
}

impl eframe::App for PlotMtfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: run form ----
        let mut ran = false;
        egui::SidePanel::left("form_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                ran = panels::side_panel(ui, &mut self.state);
            });

        if ran && self.state.maximize_plot {
            ctx.send_viewport_cmd(egui::ViewportCommand::Maximized(true));
        }

        // ---- Central panel: plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure_view(ui, &self.state);
        });
    }
}
