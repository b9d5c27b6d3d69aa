mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use app::{FilmDashboardApp, TITLE};
use config::{CONFIG_FILE, DashboardConfig};
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));

    // Without a dataset there is nothing to show: fail before opening a window.
    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    state::log_loaded(&dataset);
    if dataset.is_empty() {
        log::warn!("{} contains no films", config.data_path.display());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([600.0, 400.0])
            .with_title(TITLE),
        ..Default::default()
    };

    let state = AppState::new(config, dataset);
    eframe::run_native(
        TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(FilmDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
