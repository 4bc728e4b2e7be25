//! Dashboard Main Application
//! Main window with the filter panel and the chart viewer.

use crate::charts::ChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{MatchLoader, MatchTable};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::ppt::{PptGenerator, ReportSummary};
use crate::stats::DashboardCalculator;
use anyhow::{Context, Result};
use egui::SidePanel;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info, warn};

const REPORT_TITLE: &str = "ICC Cricket World Cup Dashboard";

/// Match data loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(MatchTable),
    Error(String),
}

/// Main application window.
pub struct CricketDashboardApp {
    config: DashboardConfig,
    table: Option<MatchTable>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl CricketDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            config,
            table: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_loading();
        app
    }

    /// Load every configured source on a background thread.
    fn start_loading(&mut self) {
        let loader = MatchLoader::new(&self.config.sources);
        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.set_progress(
            5.0,
            &format!("Loading {} sources...", loader.source_count()),
        );

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!(
                "Fetching {} sources...",
                loader.source_count()
            )));

            let result = match loader.load() {
                Ok(table) => LoadResult::Complete(table),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        let mut should_keep_receiver = true;

        while let Ok(result) = rx.try_recv() {
            match result {
                LoadResult::Progress(status) => {
                    self.control_panel.set_progress(30.0, &status);
                }
                LoadResult::Complete(table) => {
                    self.control_panel
                        .set_options(table.available_years(), table.available_teams());
                    self.control_panel.set_progress(
                        100.0,
                        &format!("Loaded {} matches", table.row_count()),
                    );
                    self.table = Some(table);
                    self.refresh();
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
                LoadResult::Error(message) => {
                    self.control_panel
                        .set_progress(0.0, &format!("Error: {}", message));
                    self.refresh();
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
            }
        }

        if should_keep_receiver {
            self.load_rx = Some(rx);
        }
    }

    /// Recompute the whole view for the current selection.
    fn refresh(&mut self) {
        let view =
            DashboardCalculator::refresh_or_empty(self.table.as_ref(), &self.control_panel.selection);
        self.control_panel.export_enabled = !view.is_empty();
        self.chart_viewer.set_view(view);
    }

    /// Ask for a destination, then render and write the report.
    fn handle_export_report(&mut self) {
        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("PowerPoint", &["pptx"])
            .set_file_name("cricket_dashboard_report.pptx")
            .save_file()
        else {
            return;
        };

        self.control_panel.set_progress(10.0, "Rendering charts...");

        match self.export_report(&output_path) {
            Ok(summary) => {
                self.control_panel.set_progress(
                    100.0,
                    &format!(
                        "Report exported: {} slides, {} charts",
                        summary.slides, summary.images
                    ),
                );
                if let Err(e) = open::that(&summary.path) {
                    warn!(error = %e, path = %summary.path.display(), "Could not open report");
                }
            }
            Err(e) => {
                error!(error = ?e, "Report export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {:#}", e));
            }
        }
    }

    fn export_report(&self, output_path: &Path) -> Result<ReportSummary> {
        let filters = self.control_panel.selection.describe();
        let images = ChartRenderer::render_dashboard(
            &self.chart_viewer.view,
            &filters,
            self.config.export.image_width,
            self.config.export.image_height,
        )
        .context("rendering dashboard charts")?;

        info!(images = images.len(), path = %output_path.display(), "Writing report");
        PptGenerator::generate_report(&images, output_path, REPORT_TITLE, &filters)
            .with_context(|| format!("writing {}", output_path.display()))
    }
}

impl eframe::App for CricketDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::FiltersChanged => self.refresh(),
                        ControlPanelAction::ExportReport => self.handle_export_report(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
