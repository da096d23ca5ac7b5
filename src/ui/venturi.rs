use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{HLine, Legend, Line, LineStyle, Plot, VLine};

use crate::calc::venturi::FLUID_PRESETS;
use crate::data::downsample::plot_points;
use crate::state::{AppState, PlotExport, Propellant};
use crate::ui::panels::{column_combo, notify};
use crate::ui::selector::clicked_x;

// ---------------------------------------------------------------------------
// Venturi mass-flow page
// ---------------------------------------------------------------------------

pub fn venturi_page(ui: &mut Ui, state: &mut AppState) {
    let title = format!("{} ṁ (Venturi)", state.venturi_form.propellant.label());
    ui.heading(title);
    ui.separator();

    egui::SidePanel::left("venturi_inputs")
        .resizable(false)
        .default_width(260.0)
        .show_inside(ui, |ui: &mut Ui| {
            inputs(ui, state);
            ui.separator();
            results(ui, state);
        });

    egui::CentralPanel::default().show_inside(ui, |ui: &mut Ui| {
        flow_plot(ui, state);
    });
}

fn inputs(ui: &mut Ui, state: &mut AppState) {
    let names = state
        .file
        .as_ref()
        .map(|f| f.table.numeric_column_names())
        .unwrap_or_default();
    let form = &mut state.venturi_form;

    ui.horizontal(|ui: &mut Ui| {
        for p in [Propellant::Oxidizer, Propellant::Fuel] {
            ui.radio_value(&mut form.propellant, p, p.label());
        }
    });

    egui::Grid::new("venturi_inputs_grid")
        .num_columns(2)
        .spacing([6.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("P₁ upstream");
            column_combo(ui, "venturi_p1", &mut form.upstream, &names);
            ui.end_row();
            ui.label("P₂ throat");
            column_combo(ui, "venturi_p2", &mut form.throat, &names);
            ui.end_row();

            for (label, buf) in [
                ("A₁ (in²)", &mut form.a1),
                ("A₂ (in²)", &mut form.a2),
                ("Cd", &mut form.cd),
                ("Y", &mut form.y),
                ("ρ (kg/m³)", &mut form.rho),
            ] {
                ui.label(label);
                ui.add(egui::TextEdit::singleline(buf).desired_width(120.0));
                ui.end_row();
            }
        });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (name, rho) in FLUID_PRESETS {
            if ui.small_button(*name).clicked() {
                form.rho = format!("{rho}");
            }
        }
    });

    ui.add_space(6.0);
    if ui.button(RichText::new("Calculate ṁ").strong()).clicked() {
        let r = state.calculate_venturi().map(|_| ());
        notify(state, r);
    }
}

fn results(ui: &mut Ui, state: &mut AppState) {
    let Some(run) = state.venturi.as_mut() else {
        ui.label("No flow computed yet.");
        return;
    };

    let p = run.params;
    ui.label(
        RichText::new(format!(
            "A₁ {} in², A₂ {} in², Cd {}, Y {}, ρ {} kg/m³",
            p.a1, p.a2, p.cd, p.y, p.rho
        ))
        .small(),
    );
    match run.summary {
        Some(s) => {
            ui.label(format!("Average ṁ (flowing): {:.4} kg/s", s.mean_flowing));
            ui.label(format!("Max ṁ: {:.4} kg/s", s.max));
        }
        None => {
            ui.label("No positive flow in data.");
        }
    }
    if let Some((w, avg)) = run.average {
        ui.label(
            RichText::new(format!(
                "Selected avg ({:.3} – {:.3} s): {avg:.4} kg/s",
                w.start(),
                w.end()
            ))
            .strong(),
        );
    }

    ui.add_space(6.0);
    ui.add(egui::Slider::new(&mut run.smoothing, 1..=100).text("Smoothing"));
    ui.label("Click the plot twice to average a range.");
}

fn flow_plot(ui: &mut Ui, state: &mut AppState) {
    let max_points = state.settings.max_plot_points;
    let Some(run) = state.venturi.as_mut() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Choose P₁ and P₂ columns, then Calculate ṁ");
        });
        return;
    };

    let save = ui.button("Save Plot…").clicked();

    let title = format!("{} ṁ", state.venturi_form.propellant.label());
    let points = plot_points(&run.time, &run.smoothed(), max_points);
    let resp = Plot::new("venturi_plot")
        .legend(Legend::default())
        .x_axis_label("Time (s)")
        .y_axis_label("ṁ (kg/s)")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name(&title)
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
            for &x in run.picks() {
                plot_ui.vline(
                    VLine::new(x)
                        .color(Color32::GRAY)
                        .style(LineStyle::dashed_loose()),
                );
            }
            if let Some((_, avg)) = run.average {
                plot_ui.hline(
                    HLine::new(avg)
                        .color(Color32::from_rgb(230, 60, 60))
                        .style(LineStyle::dashed_loose())
                        .name(format!("Avg {avg:.4} kg/s")),
                );
            }
        });

    if let Some(x) = clicked_x(&resp) {
        let r = run.click(x);
        notify(state, r);
    }

    if save {
        request_export(ui.ctx(), state, resp.response.rect, &title);
    }
}

fn request_export(ctx: &egui::Context, state: &mut AppState, rect: egui::Rect, title: &str) {
    let default_name = format!("{}_mdot.png", title.split_whitespace().next().unwrap_or("venturi"));
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save plot")
        .add_filter("PNG", &["png"])
        .set_file_name(default_name.to_lowercase())
        .save_file()
    else {
        return;
    };
    state.pending_export = Some(PlotExport { path, rect });
    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
}
