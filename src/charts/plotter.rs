//! Chart Plotter Module
//! Draws the five interactive dashboard charts with egui_plot.

use crate::stats::{HostShare, KnockoutGroup, LabelCount, YearRuns};
use egui::{Color32, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};

pub const LINE_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

pub const CHART_HEIGHT: f32 = 300.0;

pub const RUNS_OVER_YEARS_TITLE: &str = "Total Runs Over the Years";
pub const TEAM_WINS_TITLE: &str = "Team Wins Comparison";
pub const KNOCKOUT_TITLE: &str = "Winning Margins in Knockouts";
pub const TOP_PLAYERS_TITLE: &str = "Top Player of the Match Awards";
pub const HOST_TITLE: &str = "Match Distribution by Host Country";

/// Label for an x position if it lands on a category index.
fn category_label(labels: &[String], value: f64) -> String {
    if value < 0.0 || (value - value.round()).abs() > 1e-6 {
        return String::new();
    }
    labels.get(value.round() as usize).cloned().unwrap_or_default()
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn palette_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Placeholder drawn when a chart has nothing to show.
    pub fn draw_no_data(ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), CHART_HEIGHT),
            Sense::hover(),
        );
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "No data",
            egui::FontId::proportional(18.0),
            Color32::GRAY,
        );
    }

    /// Calculate beeswarm positions for points with duplicate values.
    pub fn beeswarm_positions(y_values: &[f64], center: f64, width: f64) -> Vec<f64> {
        let n = y_values.len();
        if n == 0 {
            return Vec::new();
        }

        let mut positions = vec![center; n];

        let precision = 1e6;
        let mut value_indices: HashMap<i64, Vec<usize>> = HashMap::new();

        for (i, &y) in y_values.iter().enumerate() {
            let key = (y * precision).round() as i64;
            value_indices.entry(key).or_default().push(i);
        }

        // Spread duplicates symmetrically
        for indices in value_indices.values() {
            if indices.len() > 1 {
                let count = indices.len();
                let step = width / (count - 1) as f64;
                let start = center - width / 2.0;

                for (i, &idx) in indices.iter().enumerate() {
                    positions[idx] = start + i as f64 * step;
                }
            }
        }

        positions
    }

    /// Chart 1: total runs per year as a line.
    pub fn draw_runs_over_years(ui: &mut egui::Ui, runs_by_year: &[YearRuns]) {
        if runs_by_year.is_empty() {
            Self::draw_no_data(ui);
            return;
        }

        let points: Vec<[f64; 2]> = runs_by_year
            .iter()
            .map(|p| [p.year as f64, p.runs])
            .collect();

        Plot::new("runs_over_years")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("Total Runs")
            .x_axis_formatter(|mark, _range| {
                if (mark.value - mark.value.round()).abs() < 1e-6 {
                    format!("{}", mark.value.round() as i64)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(LINE_COLOR)
                        .width(2.0)
                        .name("Total Runs"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(3.5)
                        .color(LINE_COLOR),
                );
            });
    }

    /// Bars for charts 2 and 4, one per label in the given order.
    pub fn draw_label_bars(
        ui: &mut egui::Ui,
        id: &str,
        counts: &[LabelCount],
        color: Color32,
        x_label: &str,
        y_label: &str,
    ) {
        if counts.is_empty() {
            Self::draw_no_data(ui);
            return;
        }

        let labels: Vec<String> = counts.iter().map(|c| c.label.clone()).collect();
        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Bar::new(i as f64, c.count as f64)
                    .name(&c.label)
                    .width(0.6)
                    .fill(color.gamma_multiply(0.8))
            })
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color).name(y_label));
            });
    }

    /// Chart 3: box per knockout category with the individual totals overlaid.
    pub fn draw_knockout_margins(ui: &mut egui::Ui, groups: &[KnockoutGroup]) {
        if groups.is_empty() {
            Self::draw_no_data(ui);
            return;
        }

        let labels: Vec<String> = groups.iter().map(|g| g.category.clone()).collect();

        Plot::new("knockout_margins")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Match Category")
            .y_axis_label("Team 1 Runs")
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                for (i, group) in groups.iter().enumerate() {
                    let color = Self::palette_color(i);
                    let s = &group.summary;

                    let box_elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                    )
                    .name(format!(
                        "n={}, mean {:.1}, {} outliers",
                        s.count,
                        s.mean,
                        s.outliers.len()
                    ))
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(&group.category));

                    let x_positions = Self::beeswarm_positions(&group.runs, i as f64, 0.35);
                    let points: PlotPoints = x_positions
                        .iter()
                        .zip(group.runs.iter())
                        .map(|(&x, &y)| [x, y])
                        .collect();

                    plot_ui.points(
                        Points::new(points)
                            .radius(3.0)
                            .color(color.gamma_multiply(0.7))
                            .name(format!("{} matches", group.category)),
                    );
                }
            });
    }

    /// Chart 5: host-country share as a pie with a legend underneath.
    pub fn draw_host_distribution(ui: &mut egui::Ui, shares: &[HostShare]) {
        if shares.is_empty() {
            Self::draw_no_data(ui);
            return;
        }

        let diameter = (CHART_HEIGHT - 20.0).min(ui.available_width());
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), diameter),
            Sense::hover(),
        );
        let center = rect.center();
        let radius = diameter / 2.0;
        let painter = ui.painter();

        let mut start = -FRAC_PI_2;
        for (i, share) in shares.iter().enumerate() {
            let sweep = share.share as f32 * TAU;
            let color = Self::palette_color(i);

            // Convex pieces of at most a quarter turn each.
            let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
            let piece_sweep = sweep / pieces as f32;
            for p in 0..pieces {
                let from = start + p as f32 * piece_sweep;
                let steps = 16;
                let mut points = vec![center];
                for s in 0..=steps {
                    let angle = from + piece_sweep * s as f32 / steps as f32;
                    points.push(center + radius * egui::vec2(angle.cos(), angle.sin()));
                }
                painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
            }
            start += sweep;
        }

        ui.add_space(6.0);
        ui.horizontal_wrapped(|ui| {
            for (i, share) in shares.iter().enumerate() {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                ui.painter().rect_filled(rect, 2.0, Self::palette_color(i));
                ui.label(
                    RichText::new(format!(
                        "{} {} ({:.1}%)",
                        share.country,
                        share.matches,
                        share.share * 100.0
                    ))
                    .size(12.0),
                );
                ui.add_space(8.0);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_whole_indices() {
        let labels = vec!["Final".to_string(), "Semi-Final".to_string()];
        assert_eq!(category_label(&labels, 0.0), "Final");
        assert_eq!(category_label(&labels, 1.0), "Semi-Final");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn beeswarm_spreads_duplicates_only() {
        let positions = ChartPlotter::beeswarm_positions(&[250.0, 250.0, 300.0], 1.0, 0.4);
        assert_eq!(positions[2], 1.0);
        assert!((positions[0] - 0.8).abs() < 1e-9);
        assert!((positions[1] - 1.2).abs() < 1e-9);
        assert!(ChartPlotter::beeswarm_positions(&[], 0.0, 0.4).is_empty());
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(ChartPlotter::palette_color(0), ChartPlotter::palette_color(PALETTE.len()));
    }
}
