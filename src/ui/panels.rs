use eframe::egui::{self, Color32, RichText, Ui};

use crate::error::CalcError;
use crate::state::{AppState, Notice, Tool};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.menu_button("Settings", |ui: &mut Ui| {
            let s = &mut state.settings;
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Max plot points");
                ui.add(egui::DragValue::new(&mut s.max_plot_points).range(100..=100_000));
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Ambient pressure (PSI)");
                ui.add(egui::DragValue::new(&mut s.ambient_psi).speed(0.1));
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Preview rows");
                ui.add(egui::DragValue::new(&mut s.preview_rows).range(10..=100_000));
            });
        });

        ui.separator();

        match &state.file {
            Some(f) => {
                ui.label(format!(
                    "{}: {} rows × {} columns",
                    f.name,
                    f.table.len(),
                    f.table.column_names.len()
                ));
            }
            None => {
                ui.label(RichText::new("No data loaded").color(Color32::GRAY));
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – navigation and column mapping
// ---------------------------------------------------------------------------

pub fn nav_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Tools");
    ui.separator();
    for tool in Tool::ALL {
        if ui.selectable_label(state.tool == tool, tool.label()).clicked() {
            state.tool = tool;
        }
    }

    ui.add_space(8.0);
    ui.heading("Columns");
    ui.separator();

    let Some(file) = &state.file else {
        ui.label("No dataset loaded.");
        return;
    };
    let names = file.table.column_names.clone();

    egui::Grid::new("column_mapping")
        .num_columns(2)
        .spacing([6.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Time");
            column_combo(ui, "time_col", &mut state.columns.time, &names);
            ui.end_row();
            ui.label("Pressure");
            column_combo(ui, "pressure_col", &mut state.columns.pressure, &names);
            ui.end_row();
            ui.label("Weight");
            column_combo(ui, "weight_col", &mut state.columns.weight, &names);
            ui.end_row();
        });

    if ui.small_button("Auto-detect").clicked() {
        state.columns.auto_detect(&names);
    }

    ui.add_space(8.0);
    match state.window {
        Some(w) => {
            ui.label(format!("Range: {:.3} – {:.3} s", w.start(), w.end()));
        }
        None => {
            ui.label(RichText::new("No time range selected").color(Color32::GRAY));
        }
    }
    if let Some(m) = state.mass_flow {
        ui.label(format!("ṁ = {m:.4} kg/s"));
    }
}

/// Combo box over `names`; the blank entry clears the selection.
pub fn column_combo(ui: &mut Ui, id: &str, selected: &mut Option<String>, names: &[String]) {
    let text = selected.clone().unwrap_or_else(|| "—".to_string());
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .width(150.0)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(selected.is_none(), "—").clicked() {
                *selected = None;
            }
            for name in names {
                let is_sel = selected.as_deref() == Some(name.as_str());
                if ui.selectable_label(is_sel, name).clicked() {
                    *selected = Some(name.clone());
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Home page
// ---------------------------------------------------------------------------

pub fn home_page(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(24.0);
        ui.heading("Hotfire Toolkit");
        ui.label("Flow calculations from test-stand telemetry.");
        ui.add_space(16.0);
        match &state.file {
            Some(f) => {
                ui.label(format!("Loaded: {} ({} rows)", f.name, f.table.len()));
            }
            None => {
                ui.label(RichText::new("No data loaded").color(Color32::GRAY));
            }
        }
        if ui.button("Open data file…").clicked() {
            open_file_dialog(state);
        }
        ui.add_space(16.0);
        for tool in [Tool::Cda, Tool::Venturi, Tool::Explorer] {
            if ui.button(tool.label()).clicked() {
                state.tool = tool;
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Surface an action's error as a notice; success is silent.
pub fn notify<T>(state: &mut AppState, result: Result<T, CalcError>) {
    if let Err(e) = result {
        state.report(&e);
    }
}

pub fn notice_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(Notice { title, message }) = state.notice.clone() else {
        return;
    };
    let mut dismissed = false;
    let modal = egui::Modal::new(egui::Id::new("notice")).show(ctx, |ui: &mut Ui| {
        ui.set_max_width(420.0);
        ui.heading(title);
        ui.add_space(4.0);
        ui.label(message);
        ui.add_space(8.0);
        if ui.button("OK").clicked() {
            dismissed = true;
        }
    });
    if dismissed || modal.should_close() {
        state.notice = None;
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open test data")
        .add_filter("Supported files", &["csv", "txt", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    table.len(),
                    table.column_names
                );
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                state.set_table(name, table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.notice = Some(Notice {
                    title: "Load failed".into(),
                    message: format!("{e:#}"),
                });
            }
        }
    }
}
