use eframe::egui;
use storewise::app::StorewiseApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([700.0, 460.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Storewise – Superstore Predictor",
        options,
        Box::new(|_cc| Ok(Box::new(StorewiseApp::default()))),
    )
}
