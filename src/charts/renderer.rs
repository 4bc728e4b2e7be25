//! Static Chart Renderer
//! Renders the summary cards and the five dashboard charts to PNG bytes for report export.
//!
//! Every image is drawn with plotters into an in-memory RGB buffer and encoded
//! with the `image` crate, so nothing touches disk until the report is written.

use super::plotter::{
    HOST_TITLE, KNOCKOUT_TITLE, RUNS_OVER_YEARS_TITLE, TEAM_WINS_TITLE, TOP_PLAYERS_TITLE,
};
use crate::stats::{BoxSummary, DashboardView, HostShare, KnockoutGroup, LabelCount, Summary, YearRuns};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 30;
const LABEL_MAX_CHARS: usize = 18;
const BOX_HALF_WIDTH: f64 = 0.25;

const LINE_BLUE: RGBColor = RGBColor(52, 152, 219);
const BAR_GREEN: RGBColor = RGBColor(46, 204, 113);
const BAR_ORANGE: RGBColor = RGBColor(243, 156, 18);
const MUTED: RGBColor = RGBColor(110, 110, 110);

const PALETTE: [RGBColor; 10] = [
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(255, 87, 34),
    RGBColor(121, 85, 72),
    RGBColor(96, 125, 139),
];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Pixel buffer does not match {0}x{1}")]
    Buffer(u32, u32),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Shorten long category names so axis labels stay readable.
pub fn short_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut short: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// Round an axis maximum up to a 1/2/5 multiple of a power of ten.
pub fn nice_ceiling(max: f64, target_steps: usize) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let raw_step = max / target_steps as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    let step = nice * magnitude;
    (max / step).ceil() * step
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Outline, median and whisker lines of one box. Whiskers end at the
/// furthest data points inside the 1.5 IQR fences, as on screen.
fn box_segments(center: f64, half_width: f64, s: &BoxSummary) -> Vec<[(f64, f64); 2]> {
    let (left, right) = (center - half_width, center + half_width);
    let cap = half_width / 2.0;
    vec![
        [(left, s.q1), (right, s.q1)],
        [(left, s.q3), (right, s.q3)],
        [(left, s.q1), (left, s.q3)],
        [(right, s.q1), (right, s.q3)],
        [(left, s.median), (right, s.median)],
        [(center, s.q1), (center, s.lower_whisker)],
        [(center, s.q3), (center, s.upper_whisker)],
        [(center - cap, s.lower_whisker), (center + cap, s.lower_whisker)],
        [(center - cap, s.upper_whisker), (center + cap, s.upper_whisker)],
    ]
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Summary card followed by the five charts, as PNG images.
    pub fn render_dashboard(
        view: &DashboardView,
        filters: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<Vec<u8>>, RenderError> {
        Ok(vec![
            Self::render_png(width, height, |root| {
                Self::draw_summary(root, view.summary.as_ref(), filters)
            })?,
            Self::render_png(width, height, |root| {
                Self::draw_runs_over_years(root, &view.runs_by_year)
            })?,
            Self::render_png(width, height, |root| {
                Self::draw_label_bars(root, TEAM_WINS_TITLE, "Wins", &view.team_wins, BAR_GREEN)
            })?,
            Self::render_png(width, height, |root| {
                Self::draw_knockout_margins(root, &view.knockout_margins)
            })?,
            Self::render_png(width, height, |root| {
                Self::draw_label_bars(root, TOP_PLAYERS_TITLE, "Awards", &view.top_players, BAR_ORANGE)
            })?,
            Self::render_png(width, height, |root| {
                Self::draw_host_distribution(root, &view.host_distribution)
            })?,
        ])
    }

    fn render_png<F>(width: u32, height: u32, draw: F) -> Result<Vec<u8>, RenderError>
    where
        F: FnOnce(&Area<'_>) -> Result<(), RenderError>,
    {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            draw(&root)?;
            root.present().map_err(draw_err)?;
        }
        Self::encode_png(buffer, width, height)
    }

    /// Encode a raw RGB buffer as PNG.
    pub fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    fn draw_no_data(root: &Area<'_>, title: &str) -> Result<(), RenderError> {
        let area = root.titled(title, (FONT, TITLE_SIZE)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        area.draw(&Text::new(
            "No data",
            (w as i32 / 2 - 40, h as i32 / 2),
            (FONT, 24).into_font().color(&MUTED),
        ))
        .map_err(draw_err)
    }

    fn draw_summary(
        root: &Area<'_>,
        summary: Option<&Summary>,
        filters: &str,
    ) -> Result<(), RenderError> {
        let area = root
            .titled("ICC Cricket World Cup Dashboard", (FONT, TITLE_SIZE + 6))
            .map_err(draw_err)?;

        area.draw(&Text::new(
            filters.to_string(),
            (40, 20),
            (FONT, 20).into_font().color(&MUTED),
        ))
        .map_err(draw_err)?;

        let Some(summary) = summary else {
            return area
                .draw(&Text::new(
                    "No summary available",
                    (40, 90),
                    (FONT, 26).into_font(),
                ))
                .map_err(draw_err);
        };

        for (i, (title, value)) in summary.cards().iter().enumerate() {
            let y = 90 + i as i32 * 70;
            area.draw(&Text::new(
                title.to_string(),
                (40, y),
                (FONT, 24).into_font().color(&MUTED),
            ))
            .map_err(draw_err)?;
            area.draw(&Text::new(
                value.clone(),
                (360, y - 4),
                (FONT, 30, FontStyle::Bold).into_font(),
            ))
            .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_runs_over_years(root: &Area<'_>, runs: &[YearRuns]) -> Result<(), RenderError> {
        let (Some(first), Some(last)) = (runs.first(), runs.last()) else {
            return Self::draw_no_data(root, RUNS_OVER_YEARS_TITLE);
        };
        let max_runs = runs.iter().map(|p| p.runs).fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(root)
            .caption(RUNS_OVER_YEARS_TITLE, (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(
                (first.year - 1)..(last.year + 1),
                0f64..nice_ceiling(max_runs, 5),
            )
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Total Runs")
            .draw()
            .map_err(draw_err)?;

        let points: Vec<(i32, f64)> = runs.iter().map(|p| (p.year, p.runs)).collect();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), LINE_BLUE.stroke_width(3)))
            .map_err(draw_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 5, LINE_BLUE.filled())),
            )
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_label_bars(
        root: &Area<'_>,
        title: &str,
        y_desc: &str,
        counts: &[LabelCount],
        color: RGBColor,
    ) -> Result<(), RenderError> {
        if counts.is_empty() {
            return Self::draw_no_data(root, title);
        }
        let max_count = counts.iter().map(|c| c.count).max().unwrap_or(0) as f64;
        let labels: Vec<String> = counts
            .iter()
            .map(|c| short_label(&c.label, LABEL_MAX_CHARS))
            .collect();

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(140)
            .y_label_area_size(60)
            .build_cartesian_2d(
                (0..counts.len()).into_segmented(),
                0u32..nice_ceiling(max_count, 5) as u32,
            )
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc(y_desc)
            .x_labels(counts.len())
            .x_label_style(
                (FONT, 14)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_label_formatter(&|v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .margin(8)
                    .data(counts.iter().enumerate().map(|(i, c)| (i, c.count as u32))),
            )
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_knockout_margins(root: &Area<'_>, groups: &[KnockoutGroup]) -> Result<(), RenderError> {
        if groups.is_empty() {
            return Self::draw_no_data(root, KNOCKOUT_TITLE);
        }

        let lo = groups
            .iter()
            .map(|g| g.summary.min)
            .fold(f64::INFINITY, f64::min);
        let hi = groups
            .iter()
            .map(|g| g.summary.max)
            .fold(f64::NEG_INFINITY, f64::max);
        let pad = ((hi - lo) * 0.1).max(10.0);
        let y_min = (lo - pad).max(0.0);

        let mut chart = ChartBuilder::on(root)
            .caption(KNOCKOUT_TITLE, (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(20)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(groups.len() as f64 - 0.5), y_min..(hi + pad))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Match Category")
            .y_desc("Team 1 Runs")
            .x_label_formatter(&|_: &f64| String::new())
            .draw()
            .map_err(draw_err)?;

        for (i, group) in groups.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let center = i as f64;
            let s = &group.summary;

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(center - BOX_HALF_WIDTH, s.q1), (center + BOX_HALF_WIDTH, s.q3)],
                    color.mix(0.3).filled(),
                )))
                .map_err(draw_err)?;
            chart
                .draw_series(
                    box_segments(center, BOX_HALF_WIDTH, s)
                        .into_iter()
                        .map(|segment| PathElement::new(segment.to_vec(), color.stroke_width(2))),
                )
                .map_err(draw_err)?;
            chart
                .draw_series(group.runs.iter().map(|&v| {
                    Circle::new((center, v), 4, color.mix(0.6).filled())
                }))
                .map_err(draw_err)?;
            chart
                .draw_series(std::iter::once(Text::new(
                    group.category.clone(),
                    (center - BOX_HALF_WIDTH, y_min + pad * 0.3),
                    (FONT, 18).into_font(),
                )))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_host_distribution(root: &Area<'_>, shares: &[HostShare]) -> Result<(), RenderError> {
        if shares.is_empty() {
            return Self::draw_no_data(root, HOST_TITLE);
        }

        let area = root.titled(HOST_TITLE, (FONT, TITLE_SIZE)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.32;

        let sizes: Vec<f64> = shares.iter().map(|s| s.matches as f64).collect();
        let colors: Vec<RGBColor> = (0..shares.len())
            .map(|i| PALETTE[i % PALETTE.len()])
            .collect();
        let labels: Vec<String> = shares
            .iter()
            .map(|s| format!("{} ({:.1}%)", s.country, s.share * 100.0))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.label_style((FONT, 18).into_font().color(&BLACK));
        area.draw(&pie).map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_label_truncates_on_char_boundaries() {
        assert_eq!(short_label("India", 18), "India");
        assert_eq!(
            short_label("Sri Lanka won by 5 wickets (D/L method)", 10),
            "Sri Lanka…"
        );
        assert_eq!(short_label("Zürich Zürich Zürich", 8), "Zürich …");
    }

    #[test]
    fn nice_ceiling_rounds_up() {
        // 630 / 5 = 126, so the step is 200.
        assert_eq!(nice_ceiling(630.0, 5), 800.0);
        assert_eq!(nice_ceiling(12.0, 5), 15.0);
        assert_eq!(nice_ceiling(10.0, 5), 10.0);
        assert_eq!(nice_ceiling(7.0, 5), 8.0);
        assert_eq!(nice_ceiling(0.0, 5), 1.0);
    }

    #[test]
    fn exported_whiskers_stop_at_data_points() {
        let summary = BoxSummary::from_values(&[241.0, 250.0, 260.0, 274.0, 291.0, 100.0]).unwrap();
        let segments = box_segments(1.0, 0.25, &summary);

        let whisker_ends: Vec<f64> = segments
            .iter()
            .filter(|[a, b]| a.0 == 1.0 && b.0 == 1.0)
            .map(|[_, b]| b.1)
            .collect();
        assert_eq!(whisker_ends, vec![241.0, 291.0]);
        assert!(segments.iter().any(|[a, b]| a.1 == 255.0 && b.1 == 255.0));
        assert!(segments
            .iter()
            .flatten()
            .all(|&(_, y)| y != 100.0 && y > summary.q1 - 1.5 * (summary.q3 - summary.q1)));
    }

    #[test]
    fn encodes_png_signature() {
        let png = ChartRenderer::encode_png(vec![255u8; 4 * 3 * 3], 4, 3).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let err = ChartRenderer::encode_png(vec![0u8; 5], 4, 3).unwrap_err();
        assert!(matches!(err, RenderError::Buffer(4, 3)));
    }
}
