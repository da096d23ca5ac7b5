use eframe::egui;

use crate::state::{AppState, Tool};
use crate::ui::{cda, explorer, export, panels, selector, venturi};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct HotfireApp {
    pub state: AppState,
}

impl eframe::App for HotfireApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Pending plot export from a previous frame ----
        export::handle_screenshot(ctx, &mut self.state);

        // Panels stay visible but inert under an open dialog.
        let idle = self.state.selector.is_none()
            && self.state.low_column_dialog.is_none()
            && self.state.notice.is_none();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_enabled_ui(idle, |ui| panels::top_bar(ui, &mut self.state));
        });

        // ---- Left side panel: navigation + column mapping ----
        egui::SidePanel::left("nav_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.add_enabled_ui(idle, |ui| panels::nav_panel(ui, &mut self.state));
            });

        // ---- Central panel: active tool ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(idle, |ui| match self.state.tool {
                Tool::Home => panels::home_page(ui, &mut self.state),
                Tool::Cda => cda::cda_page(ui, &mut self.state),
                Tool::Venturi => venturi::venturi_page(ui, &mut self.state),
                Tool::Explorer => explorer::explorer_page(ui, &mut self.state),
            });
        });

        // ---- Dialogs ----
        selector::selector_window(ctx, &mut self.state);
        cda::low_column_window(ctx, &mut self.state);
        panels::notice_window(ctx, &mut self.state);
    }
}
