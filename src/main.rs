mod app;
mod chaos;
mod session;
mod settings;
mod share;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chaos Tapestry",
        options,
        Box::new(|cc| Ok(Box::new(app::TapestryApp::new(cc)))),
    )
}
