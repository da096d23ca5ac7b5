use eframe::egui::{self, RichText, Ui};

use crate::calc::cda::DENSITY_PRESETS;
use crate::state::{AppState, Notice, PressureSide};
use crate::ui::panels::{column_combo, notify};

// ---------------------------------------------------------------------------
// CdA calculator page
// ---------------------------------------------------------------------------

pub fn cda_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("CdA Calculator");
    ui.separator();
    ui.columns(2, |cols| {
        cda_panel(&mut cols[0], state);
        setpoint_panel(&mut cols[1], state);
    });
}

fn cda_panel(ui: &mut Ui, state: &mut AppState) {
    ui.group(|ui: &mut Ui| {
        ui.strong("CdA from test data");
        ui.add_space(4.0);

        if ui.button("Select Time Range…").clicked() {
            let r = state.open_selector();
            notify(state, r);
        }
        match (state.window, state.mass_flow) {
            (Some(w), Some(m)) => {
                ui.label(format!(
                    "Range {:.3} – {:.3} s   ṁ = {m:.4} kg/s",
                    w.start(),
                    w.end()
                ));
            }
            (Some(w), None) => {
                ui.label(format!(
                    "Range {:.3} – {:.3} s   ṁ undefined",
                    w.start(),
                    w.end()
                ));
            }
            _ => {
                ui.label("No range selected.");
            }
        }
        ui.add_space(6.0);

        egui::Grid::new("cda_inputs")
            .num_columns(3)
            .spacing([6.0, 4.0])
            .show(ui, |ui: &mut Ui| {
                ui.label("P_high (PSI)");
                ui.text_edit_singleline(&mut state.cda_form.p_high);
                if ui.button("Use Avg").clicked() {
                    let r = state.use_average_pressure(PressureSide::High);
                    notify(state, r);
                }
                ui.end_row();

                ui.label("P_low (PSI)");
                ui.text_edit_singleline(&mut state.cda_form.p_low);
                ui.horizontal(|ui: &mut Ui| {
                    if ui.button("Ambient").clicked() {
                        state.set_ambient_low();
                    }
                    if ui.button("From CSV…").clicked() {
                        let r = state.open_low_column_dialog();
                        notify(state, r);
                    }
                });
                ui.end_row();

                ui.label("Density ρ (kg/m³)");
                ui.text_edit_singleline(&mut state.cda_form.rho);
                ui.end_row();
            });

        ui.add_space(6.0);
        if ui.button(RichText::new("Calculate CdA").strong()).clicked() {
            let r = state.calculate_cda().map(|_| ());
            notify(state, r);
        }

        if let Some(res) = state.last_cda {
            ui.separator();
            ui.label(format!("ΔP = {:.0} Pa", res.delta_p));
            ui.label(RichText::new(format!("CdA = {:.6e} m²", res.cda)).strong());
            ui.label(format!("CdA = {:.4} mm²", res.cda_mm2()));
            if ui.small_button("Copy JSON").clicked() {
                match state.cda_json() {
                    Ok(json) => ui.ctx().copy_text(json),
                    Err(e) => {
                        log::error!("Copy JSON failed: {e:#}");
                        state.notice = Some(Notice {
                            title: "Copy failed".into(),
                            message: format!("{e:#}"),
                        });
                    }
                }
            }
        }
    });
}

fn setpoint_panel(ui: &mut Ui, state: &mut AppState) {
    ui.group(|ui: &mut Ui| {
        ui.strong("Required set pressure");
        ui.add_space(4.0);

        egui::Grid::new("setpoint_inputs")
            .num_columns(3)
            .spacing([6.0, 4.0])
            .show(ui, |ui: &mut Ui| {
                ui.label("CdA (m²)");
                ui.text_edit_singleline(&mut state.setpoint_form.cda);
                if ui.button("Use calculated").clicked() {
                    let r = state.copy_cda_to_setpoint();
                    notify(state, r);
                }
                ui.end_row();

                ui.label("Target ṁ (kg/s)");
                ui.text_edit_singleline(&mut state.setpoint_form.mdot);
                if ui.button("Use from data").clicked() {
                    let r = state.copy_mdot_to_setpoint();
                    notify(state, r);
                }
                ui.end_row();

                ui.label("Density ρ (kg/m³)");
                ui.text_edit_singleline(&mut state.setpoint_form.rho);
                ui.horizontal(|ui: &mut Ui| {
                    for (name, rho) in DENSITY_PRESETS {
                        if ui.small_button(*name).clicked() {
                            state.setpoint_form.rho = format!("{rho}");
                        }
                    }
                });
                ui.end_row();

                ui.label("Manifold P (PSI)");
                ui.text_edit_singleline(&mut state.setpoint_form.manifold);
                ui.end_row();
            });

        ui.add_space(6.0);
        if ui.button(RichText::new("Calculate Set Pressure").strong()).clicked() {
            let r = state.calculate_setpoint().map(|_| ());
            notify(state, r);
        }

        if let Some(res) = state.last_setpoint {
            ui.separator();
            ui.label(format!("ΔP = {:.0} Pa", res.delta_p));
            ui.label(RichText::new(format!("P_set = {:.2} PSI", res.p_set_psi())).strong());
            ui.label(format!("P_set = {:.0} Pa", res.p_set_pa));
        }
    });
}

// ---------------------------------------------------------------------------
// "P_low from column" dialog
// ---------------------------------------------------------------------------

pub fn low_column_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(mut picked) = state.low_column_dialog.clone() else {
        return;
    };
    let names = state
        .file
        .as_ref()
        .map(|f| f.table.numeric_column_names())
        .unwrap_or_default();

    // Backdrop clicks are ignored: the column list is a popup outside the modal.
    let mut apply = false;
    let mut cancel = false;
    egui::Modal::new(egui::Id::new("low_column_dialog")).show(ctx, |ui: &mut Ui| {
        ui.set_width(320.0);
        ui.heading("P_low from column");
        ui.label("Average this column over the selected time range:");
        column_combo(ui, "low_col", &mut picked, &names);
        ui.add_space(6.0);
        ui.horizontal(|ui: &mut Ui| {
            apply = ui.button("Apply").clicked();
            cancel = ui.button("Cancel").clicked();
        });
    });

    if apply {
        let r = state.use_column_average_for_low(picked.as_deref());
        let ok = r.is_ok();
        notify(state, r);
        if ok {
            state.low_column_dialog = None;
        }
    } else if cancel || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        state.low_column_dialog = None;
    } else {
        state.low_column_dialog = Some(picked);
    }
}
