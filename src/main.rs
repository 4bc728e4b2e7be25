//! Cricket Dashboard - ICC Cricket World Cup match statistics
//!
//! Loads every tournament's match table, then shows filterable summary cards and charts.

mod charts;
mod config;
mod data;
mod gui;
mod ppt;
mod stats;

use config::{DashboardConfig, CONFIG_FILE_NAME};
use eframe::egui;
use gui::CricketDashboardApp;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cricket_dashboard=debug".into()),
        )
        .init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE_NAME))?;
    tracing::info!(sources = config.sources.locations.len(), "Starting dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("ICC Cricket World Cup Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Cricket Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(CricketDashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}
