mod app;
mod calc;
mod color;
mod config;
mod data;
mod error;
mod selection;
mod state;
mod ui;

use app::HotfireApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Hotfire Toolkit",
        options,
        Box::new(|_cc| Ok(Box::new(HotfireApp::default()))),
    )
}
