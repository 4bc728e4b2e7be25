//! Chart Viewer Widget
//! Central scrollable panel with the summary cards and the five chart cards.
//! Chart cards wrap into as many columns as the width allows.

use crate::charts::{
    ChartPlotter, HOST_TITLE, KNOCKOUT_TITLE, RUNS_OVER_YEARS_TITLE, TEAM_WINS_TITLE,
    TOP_PLAYERS_TITLE,
};
use crate::stats::DashboardView;
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CHART_WIDTH: f32 = 620.0;
const SUMMARY_CARD_WIDTH: f32 = 200.0;
const ACCENT: Color32 = Color32::from_rgb(100, 149, 237);

#[derive(Clone, Copy)]
enum ChartKind {
    RunsOverYears,
    TeamWins,
    KnockoutMargins,
    TopPlayers,
    HostDistribution,
}

const CHARTS: [(ChartKind, &str); 5] = [
    (ChartKind::RunsOverYears, RUNS_OVER_YEARS_TITLE),
    (ChartKind::TeamWins, TEAM_WINS_TITLE),
    (ChartKind::KnockoutMargins, KNOCKOUT_TITLE),
    (ChartKind::TopPlayers, TOP_PLAYERS_TITLE),
    (ChartKind::HostDistribution, HOST_TITLE),
];

/// Number of chart columns that fit in `available_width`, at least one.
fn column_count(available_width: f32) -> usize {
    ((available_width / (CHART_WIDTH + CHART_SPACING)).floor() as usize).max(1)
}

/// Displays the latest dashboard view.
#[derive(Default)]
pub struct ChartViewer {
    pub view: DashboardView,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything on screen with a freshly computed view.
    pub fn set_view(&mut self, view: DashboardView) {
        self.view = view;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.draw_summary_cards(ui);
                ui.add_space(CHART_SPACING);

                let columns = column_count(ui.available_width());
                for row in CHARTS.chunks(columns) {
                    ui.horizontal(|ui| {
                        for &(kind, title) in row {
                            self.draw_chart_card(ui, kind, title);
                            ui.add_space(CHART_SPACING);
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    fn draw_summary_cards(&self, ui: &mut egui::Ui) {
        let Some(summary) = &self.view.summary else {
            ui.label(
                RichText::new("No summary available")
                    .size(16.0)
                    .color(Color32::GRAY),
            );
            return;
        };

        ui.horizontal_wrapped(|ui| {
            for (title, value) in summary.cards() {
                egui::Frame::none()
                    .rounding(8.0)
                    .stroke(egui::Stroke::new(1.5, ACCENT))
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(SUMMARY_CARD_WIDTH);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(title).size(12.0).color(Color32::GRAY));
                            ui.label(RichText::new(value).size(20.0).strong());
                        });
                    });
                ui.add_space(8.0);
            }
        });
    }

    fn draw_chart_card(&self, ui: &mut egui::Ui, kind: ChartKind, title: &str) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(CHART_WIDTH - 24.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(16.0).strong().color(ACCENT));
                    ui.add_space(8.0);

                    let view = &self.view;
                    match kind {
                        ChartKind::RunsOverYears => {
                            ChartPlotter::draw_runs_over_years(ui, &view.runs_by_year)
                        }
                        ChartKind::TeamWins => ChartPlotter::draw_label_bars(
                            ui,
                            "team_wins",
                            &view.team_wins,
                            ChartPlotter::palette_color(1),
                            "Team",
                            "Wins",
                        ),
                        ChartKind::KnockoutMargins => {
                            ChartPlotter::draw_knockout_margins(ui, &view.knockout_margins)
                        }
                        ChartKind::TopPlayers => ChartPlotter::draw_label_bars(
                            ui,
                            "top_players",
                            &view.top_players,
                            ChartPlotter::palette_color(3),
                            "Player",
                            "Awards",
                        ),
                        ChartKind::HostDistribution => {
                            ChartPlotter::draw_host_distribution(ui, &view.host_distribution)
                        }
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_least_one_column() {
        assert_eq!(column_count(0.0), 1);
        assert_eq!(column_count(CHART_WIDTH), 1);
        assert_eq!(column_count(2.0 * (CHART_WIDTH + CHART_SPACING)), 2);
    }
}
