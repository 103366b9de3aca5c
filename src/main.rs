#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use webp_to_jpeg::{app, logging};

fn main() -> eframe::Result<()> {
    logging::initialize(logging::LogDestination::Both);
    log::info!("Starting WebP to JPEG {}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("WebP to JPEG")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "WebP to JPEG",
        options,
        Box::new(|cc| Ok(Box::new(app::ConverterApp::new(cc)))),
    )
}
