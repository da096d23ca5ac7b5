use eframe::egui::{self, Color32, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotUi, VLine};

use crate::selection::{SelectorSession, TimeRangeSelector};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Time-range selector dialog
// ---------------------------------------------------------------------------

const START_COLOR: Color32 = Color32::from_rgb(60, 180, 75);
const END_COLOR: Color32 = Color32::from_rgb(230, 60, 60);

enum Action {
    Reset,
    Cancel,
    Confirm,
}

/// Render the selector modal while a session is open. Escape and clicks
/// outside count as Cancel.
pub fn selector_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(session) = state.selector.as_mut() else {
        return;
    };

    let mut action = None;
    let modal = egui::Modal::new(egui::Id::new("time_range_selector")).show(ctx, |ui: &mut Ui| {
        ui.set_width(860.0);
        ui.heading("Select Time Range");
        ui.label("Click once for the start time and again for the end time.");
        ui.horizontal(|ui: &mut Ui| {
            let fmt = |v: Option<f64>| v.map_or("—".to_string(), |t| format!("{t:.3} s"));
            ui.label(format!("Start: {}", fmt(session.selector.start())));
            ui.label(format!("End: {}", fmt(session.selector.end())));
        });
        ui.separator();

        selector_plots(ui, session);

        ui.separator();
        ui.horizontal(|ui: &mut Ui| {
            if ui.button("Reset").clicked() {
                action = Some(Action::Reset);
            }
            if ui.button("Cancel").clicked() {
                action = Some(Action::Cancel);
            }
            let confirm = ui.add_enabled(
                session.selector.can_confirm(),
                egui::Button::new("Confirm"),
            );
            if confirm.clicked() {
                action = Some(Action::Confirm);
            }
        });
    });

    // Escape or a click on the backdrop.
    if action.is_none() && modal.should_close() {
        action = Some(Action::Cancel);
    }

    match action {
        Some(Action::Reset) => session.selector.reset(),
        Some(Action::Confirm) => {
            let outcome = session.confirm();
            state.close_selector(outcome);
        }
        Some(Action::Cancel) => state.close_selector(None),
        None => {}
    }
}

fn selector_plots(ui: &mut Ui, session: &mut SelectorSession) {
    let has_weight = session.weight_points.is_some();
    let height = if has_weight { 240.0 } else { 420.0 };
    let link = egui::Id::new("selector_time_axis");

    let pressure = Plot::new("selector_pressure")
        .height(height)
        .legend(Legend::default())
        .y_axis_label("Pressure")
        .link_axis(link, egui::Vec2b::new(true, false))
        .link_cursor(link, egui::Vec2b::new(true, false))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(session.pressure_points.clone())
                    .name(&session.pressure_label)
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
            edge_markers(plot_ui, &session.selector);
        });
    if let Some(x) = clicked_x(&pressure) {
        session.selector.click(x);
    }

    match (&session.weight_points, &session.weight_label) {
        (Some(points), Some(label)) => {
            let weight = Plot::new("selector_weight")
                .height(height)
                .legend(Legend::default())
                .x_axis_label("Time (s)")
                .y_axis_label("Weight")
                .link_axis(link, egui::Vec2b::new(true, false))
                .link_cursor(link, egui::Vec2b::new(true, false))
                .show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(points.clone())
                            .name(label)
                            .color(Color32::GOLD)
                            .width(1.5),
                    );
                    edge_markers(plot_ui, &session.selector);
                });
            if let Some(x) = clicked_x(&weight) {
                session.selector.click(x);
            }
        }
        _ => {
            ui.label("No weight column selected: ṁ will not be computed for this range.");
        }
    }
}

fn edge_markers(plot_ui: &mut PlotUi, selector: &TimeRangeSelector) {
    if let Some(start) = selector.start() {
        plot_ui.vline(
            VLine::new(start)
                .color(START_COLOR)
                .style(LineStyle::dashed_loose())
                .name("Start"),
        );
    }
    if let Some(end) = selector.end() {
        plot_ui.vline(
            VLine::new(end)
                .color(END_COLOR)
                .style(LineStyle::dashed_loose())
                .name("End"),
        );
    }
}

/// Plot x-coordinate of a primary click inside the plot area, if any.
pub fn clicked_x<R>(resp: &egui_plot::PlotResponse<R>) -> Option<f64> {
    if !resp.response.clicked() {
        return None;
    }
    let pos = resp.response.interact_pointer_pos()?;
    Some(resp.transform.value_from_position(pos).x)
}
