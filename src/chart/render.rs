//! PNG rendering with plotters.

use std::error::Error as StdError;
use std::path::Path;

use plotters::prelude::*;
use plotters::style::FontStyle;

use super::{BarChart, Figure, FigureRenderer, LineChart, Rgb, value_bounds};
use crate::error::{Error, Result};

type DrawResult = std::result::Result<(), Box<dyn StdError>>;

/// Renders figures to PNG through the plotters bitmap backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngRenderer;

impl FigureRenderer for PngRenderer {
    fn render(&self, figure: &Figure, path: &Path) -> Result<()> {
        let drawn = match figure {
            Figure::Bars(chart) => draw_bar_chart(chart, path),
            Figure::Lines(chart) => draw_line_chart(chart, path),
        };
        drawn.map_err(|e| Error::Render(format!("{}: {e}", path.display())))
    }
}

impl From<Rgb> for RGBColor {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        RGBColor(r, g, b)
    }
}

fn chart_builder<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
) -> ChartBuilder<'_, 'static, DB> {
    let mut builder = ChartBuilder::on(root);
    builder.margin(20).x_label_area_size(50).y_label_area_size(70);
    builder
}

fn draw_bar_chart(chart: &BarChart, path: &Path) -> DrawResult {
    let config = &chart.config;
    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    // Shift x so the category ticks land on whole numbers; the mesh then
    // labels each tick with its category name.
    let shift = chart.tick_offset;
    let half = chart.bar_width / 2.0;
    let n = chart.category_count().max(1);
    let lowest = -shift - half;
    let highest = (n - 1) as f64 + chart.series.len().saturating_sub(1) as f64 * chart.bar_width
        - shift
        + half;
    let x_range = (lowest.min(-0.5))..(highest.max(n as f64 - 0.5));

    let (y_min, y_max) = value_bounds(chart.bars().map(|b| b.height), true);

    let mut ctx = chart_builder(&root).build_cartesian_2d(x_range, y_min..y_max)?;

    let label_at = |x: &f64| -> String {
        let index = x.round();
        if (x - index).abs() > 1e-6 || index < 0.0 {
            return String::new();
        }
        chart
            .categories
            .get(index as usize)
            .cloned()
            .unwrap_or_default()
    };

    ctx.configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .x_label_formatter(&label_at)
        .x_desc(config.x_label.as_str())
        .y_desc(config.y_label.as_str())
        .axis_desc_style(("sans-serif", 18).into_font().style(FontStyle::Bold))
        .draw()?;

    let edge: RGBColor = chart.edge_color.into();
    for (index, series) in chart.series.iter().enumerate() {
        let fill: RGBColor = series.color.into();
        let rects = chart
            .bars()
            .filter(|bar| bar.series == index && bar.height.is_finite())
            .flat_map(|bar| {
                let corners = [
                    (bar.center - shift - half, 0.0),
                    (bar.center - shift + half, bar.height),
                ];
                [
                    Rectangle::new(corners, fill.filled()),
                    Rectangle::new(corners, edge.stroke_width(1)),
                ]
            });

        ctx.draw_series(rects)?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], fill.filled()));
    }

    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn draw_line_chart(chart: &LineChart, path: &Path) -> DrawResult {
    let config = &chart.config;
    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let points = || chart.series.iter().flat_map(|s| s.points.iter());
    let (x_min, x_max) = value_bounds(points().map(|p| p.0), false);
    let (y_min, y_max) = value_bounds(points().map(|p| p.1), false);

    let mut ctx = chart_builder(&root).build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    ctx.configure_mesh()
        .disable_mesh()
        .x_desc(config.x_label.as_str())
        .y_desc(config.y_label.as_str())
        .draw()?;

    for series in &chart.series {
        let color: RGBColor = series.color.into();
        let width = series.stroke_width;
        ctx.draw_series(plotters::series::LineSeries::new(
            series.points.iter().copied().filter(|(_, y)| y.is_finite()),
            color.stroke_width(width),
        ))?
        .label(series.name.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width)));
    }

    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
