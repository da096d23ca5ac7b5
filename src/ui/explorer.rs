use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Data explorer: channel overlay plus a raw table preview
// ---------------------------------------------------------------------------

pub fn explorer_page(ui: &mut Ui, state: &mut AppState) {
    let Some(file) = &state.file else {
        plot::channel_plot(ui, state);
        return;
    };
    let numeric = file.table.numeric_column_names();

    egui::SidePanel::left("explorer_channels")
        .default_width(180.0)
        .show_inside(ui, |ui: &mut Ui| {
            ui.strong("Channels");
            ui.separator();
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                for col in &numeric {
                    let mut checked = state.explorer.overlay.contains(col);
                    let text = RichText::new(col).color(state.explorer.colors.color_for(col));
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_overlay(col);
                    }
                }
            });
        });

    egui::TopBottomPanel::bottom("explorer_table")
        .resizable(true)
        .default_height(ui.available_height() * 0.4)
        .show_inside(ui, |ui: &mut Ui| {
            preview_table(ui, state);
        });

    egui::CentralPanel::default().show_inside(ui, |ui: &mut Ui| {
        plot::channel_plot(ui, state);
    });
}

fn preview_table(ui: &mut Ui, state: &AppState) {
    let Some(file) = &state.file else {
        return;
    };
    let table = &file.table;
    if table.is_empty() {
        ui.label("The file has a header but no rows.");
        return;
    }
    let n_rows = table.len().min(state.settings.preview_rows);
    ui.label(format!("First {n_rows} of {} rows", table.len()));

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(80.0), table.column_names.len())
        .header(20.0, |mut header| {
            for name in &table.column_names {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, n_rows, |mut row| {
                let r = row.index();
                for c in 0..table.column_names.len() {
                    row.col(|ui| {
                        if let Some(cell) = table.cell(r, c) {
                            ui.label(cell.to_string());
                        }
                    });
                }
            });
        });
}
