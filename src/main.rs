//! 桌面入口（Rust + egui）

use cycle_timer::app::CycleTimerApp;
use cycle_timer::config::AppConfig;
use cycle_timer::error::AppError;
use cycle_timer::logging;

fn main() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    logging::init(&config.log_filter)?;
    tracing::info!(
        default_minutes = config.default_minutes_amount,
        "starting cycle timer"
    );

    let title = config.idle_title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_title(&title),
        ..Default::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(CycleTimerApp::new(cc, config)))),
    )?;
    Ok(())
}
