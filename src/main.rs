mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use aadhaar_dash::DashboardConfig;
use app::DashboardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let mut config = DashboardConfig::from_env();
    if let Some(path) = std::env::args_os().nth(1) {
        config.data_path = Some(PathBuf::from(path));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Aadhaar Lifecycle Stress Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
}
