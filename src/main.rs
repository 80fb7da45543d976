mod app;
mod color;
mod config;
mod data;
mod playback;
mod state;
mod tween;
mod ui;

use std::path::Path;

use app::PrevalenceApp;
use config::{ViewerConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::load_or_default(Path::new(CONFIG_FILE));
    log::debug!("viewer config: {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Overweight & Obesity Prevalence 1990–2013",
        options,
        Box::new(move |_cc| Ok(Box::new(PrevalenceApp::new(config)))),
    )
}
