use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot};

use crate::data::downsample::plot_points;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Channel overlay plot (data explorer)
// ---------------------------------------------------------------------------

/// Plot every ticked column against time, or against row index when no
/// usable time column is set.
pub fn channel_plot(ui: &mut Ui, state: &AppState) {
    let file = match &state.file {
        Some(f) => f,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view data  (File → Open…)");
            });
            return;
        }
    };
    let table = &file.table;

    let time = state
        .columns
        .require_time()
        .ok()
        .and_then(|col| table.time_seconds(col).ok());
    let x_label = if time.is_some() { "Time (s)" } else { "Row" };
    let x: Vec<f64> = time.unwrap_or_else(|| (0..table.len()).map(|i| i as f64).collect());

    let max_points = state.settings.max_plot_points;
    let colors = &state.explorer.colors;

    Plot::new("channel_plot")
        .legend(Legend::default())
        .x_axis_label(x_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for col in &state.explorer.overlay {
                let Ok(y) = table.numeric(col) else {
                    continue;
                };
                let line = Line::new(plot_points(&x, &y, max_points))
                    .name(col)
                    .color(colors.color_for(col))
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}
