//! Control Panel Widget
//! Left side panel with the year and team filters, status and report export.

use crate::data::FilterSelection;
use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeSet;

const LIST_HEIGHT: f32 = 180.0;

/// Left side control panel holding the current filter selection.
pub struct ControlPanel {
    pub selection: FilterSelection,
    pub years: Vec<i32>,
    pub teams: Vec<String>,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selection: FilterSelection::default(),
            years: Vec::new(),
            teams: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

/// Flip membership of `value` in `set`.
fn toggle<T: Ord + Clone>(set: &mut BTreeSet<T>, value: &T, selected: bool) {
    if selected {
        set.insert(value.clone());
    } else {
        set.remove(value);
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filter options after a load. Selected values that no longer exist are dropped.
    pub fn set_options(&mut self, years: Vec<i32>, teams: Vec<String>) {
        self.selection.years.retain(|y| years.contains(y));
        self.selection.teams.retain(|t| teams.contains(t));
        self.years = years;
        self.teams = teams;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🏏 World Cup Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("ICC Cricket World Cup 1975-2023")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Year filter =====
        ui.horizontal(|ui| {
            ui.label(RichText::new("📅 Years").size(14.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Clear").clicked() && !self.selection.years.is_empty() {
                    self.selection.years.clear();
                    action = ControlPanelAction::FiltersChanged;
                }
            });
        });
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("year_filter")
                    .max_height(LIST_HEIGHT)
                    .show(ui, |ui| {
                        for year in &self.years {
                            let mut selected = self.selection.years.contains(year);
                            if ui.checkbox(&mut selected, year.to_string()).changed() {
                                toggle(&mut self.selection.years, year, selected);
                                action = ControlPanelAction::FiltersChanged;
                            }
                        }
                    });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Team filter =====
        ui.horizontal(|ui| {
            ui.label(RichText::new("👥 Teams").size(14.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Clear").clicked() && !self.selection.teams.is_empty() {
                    self.selection.teams.clear();
                    action = ControlPanelAction::FiltersChanged;
                }
            });
        });
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("team_filter")
                    .max_height(LIST_HEIGHT)
                    .show(ui, |ui| {
                        for team in &self.teams {
                            let mut selected = self.selection.teams.contains(team);
                            if ui.checkbox(&mut selected, team.as_str()).changed() {
                                toggle(&mut self.selection.teams, team, selected);
                                action = ControlPanelAction::FiltersChanged;
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.label(
            RichText::new(self.selection.describe())
                .size(11.0)
                .color(Color32::GRAY),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("📄 Export Report").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportReport;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.progress >= 100.0 {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    FiltersChanged,
    ExportReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_and_removes() {
        let mut years = BTreeSet::new();
        toggle(&mut years, &2011, true);
        toggle(&mut years, &2003, true);
        assert_eq!(years.iter().copied().collect::<Vec<_>>(), vec![2003, 2011]);
        toggle(&mut years, &2011, false);
        assert_eq!(years.iter().copied().collect::<Vec<_>>(), vec![2003]);
    }

    #[test]
    fn new_options_drop_stale_selections() {
        let mut panel = ControlPanel::new();
        panel.selection.years.insert(1975);
        panel.selection.years.insert(2011);
        panel.selection.teams.insert("Zimbabwe".to_string());

        panel.set_options(vec![2011, 2015], vec!["India".to_string()]);
        assert_eq!(panel.selection.years.iter().copied().collect::<Vec<_>>(), vec![2011]);
        assert!(panel.selection.teams.is_empty());
        assert_eq!(panel.years, vec![2011, 2015]);
    }
}
