mod app;
mod panels;
mod state;

pub use app::KalconvApp;

use anyhow::Result;
use eframe::egui;

/// Open the application window and run until it is closed
pub fn run() -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Kal Image Converter",
        options,
        Box::new(|cc| Ok(Box::new(KalconvApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run GUI: {}", e))
}
