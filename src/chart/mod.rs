//! In-memory chart descriptions.
//!
//! A [`Figure`] records everything needed to draw a chart: canvas size,
//! axis labels, and the series with their colors and positions. It carries
//! no drawing state, so it can be inspected in tests or serialized. A
//! [`FigureRenderer`] turns it into a file.

mod render;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use render::PngRenderer;

use crate::error::Result;

/// RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Pure red.
    pub const RED: Self = Self(255, 0, 0);
    /// Dark green.
    pub const GREEN: Self = Self(0, 128, 0);
    /// Mid grey, used for bar edges.
    pub const GREY: Self = Self(128, 128, 128);
    /// Default first line color.
    pub const BLUE: Self = Self(31, 119, 180);
    /// Default second line color.
    pub const ORANGE: Self = Self(255, 127, 14);
}

/// Chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// X-axis label.
    pub x_label: String,
    /// Y-axis label.
    pub y_label: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            x_label: String::new(),
            y_label: String::new(),
            width: 1200,
            height: 800,
        }
    }
}

impl ChartConfig {
    /// Creates a configuration with default size and no labels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the X-axis label.
    #[must_use]
    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    /// Sets the Y-axis label.
    #[must_use]
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    /// Sets the canvas dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// One series of a bar chart: one value per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// Legend label.
    pub name: String,
    /// Fill color.
    pub color: Rgb,
    /// Bar heights, one per category.
    pub values: Vec<f64>,
}

/// A single positioned bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Category index.
    pub category: usize,
    /// Series index.
    pub series: usize,
    /// Horizontal center of the bar.
    pub center: f64,
    /// Bar height.
    pub height: f64,
}

/// Grouped bar chart.
///
/// Category `i` starts at x = `i`. Series `j` is drawn centered at
/// `i + j * bar_width`, and the category tick sits at `i + tick_offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    /// Size and labels.
    pub config: ChartConfig,
    /// Tick labels, one per category.
    pub categories: Vec<String>,
    /// Series drawn side by side within each category.
    pub series: Vec<BarSeries>,
    /// Width of a single bar in category units.
    pub bar_width: f64,
    /// Tick position relative to the category start.
    pub tick_offset: f64,
    /// Outline color for every bar.
    pub edge_color: Rgb,
}

impl BarChart {
    /// Creates an empty bar chart with the given categories.
    #[must_use]
    pub fn new(config: ChartConfig, categories: Vec<String>, bar_width: f64) -> Self {
        Self {
            config,
            categories,
            series: Vec::new(),
            bar_width,
            tick_offset: 0.0,
            edge_color: Rgb::GREY,
        }
    }

    /// Adds a series. Values beyond the category count are not drawn.
    #[must_use]
    pub fn with_series(mut self, name: impl Into<String>, color: Rgb, values: Vec<f64>) -> Self {
        self.series.push(BarSeries {
            name: name.into(),
            color,
            values,
        });
        self
    }

    /// Moves the category ticks.
    #[must_use]
    pub fn with_tick_offset(mut self, offset: f64) -> Self {
        self.tick_offset = offset;
        self
    }

    /// Number of category groups.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of bars in each category group.
    #[must_use]
    pub fn bars_per_category(&self) -> usize {
        self.series.len()
    }

    /// All bars with their positions, series by series.
    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        let categories = self.categories.len();
        self.series.iter().enumerate().flat_map(move |(s, series)| {
            series
                .values
                .iter()
                .take(categories)
                .enumerate()
                .map(move |(c, &height)| Bar {
                    category: c,
                    series: s,
                    center: c as f64 + s as f64 * self.bar_width,
                    height,
                })
        })
    }

    /// X positions of the category ticks.
    #[must_use]
    pub fn tick_positions(&self) -> Vec<f64> {
        (0..self.categories.len())
            .map(|c| c as f64 + self.tick_offset)
            .collect()
    }
}

/// One series of a line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    /// Legend label.
    pub name: String,
    /// Stroke color.
    pub color: Rgb,
    /// Stroke width in pixels.
    pub stroke_width: u32,
    /// Points in drawing order.
    pub points: Vec<(f64, f64)>,
}

/// Line chart with one or more series on shared axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    /// Size and labels.
    pub config: ChartConfig,
    /// Series to draw.
    pub series: Vec<LineSeries>,
}

impl LineChart {
    /// Creates an empty line chart.
    #[must_use]
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            series: Vec::new(),
        }
    }

    /// Adds a series plotted against its index (0, 1, 2, ...).
    #[must_use]
    pub fn with_indexed_series(
        mut self,
        name: impl Into<String>,
        color: Rgb,
        stroke_width: u32,
        values: &[f64],
    ) -> Self {
        self.series.push(LineSeries {
            name: name.into(),
            color,
            stroke_width,
            points: values
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v))
                .collect(),
        });
        self
    }
}

/// A renderable chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    /// Grouped bar chart.
    Bars(BarChart),
    /// Line chart.
    Lines(LineChart),
}

impl Figure {
    /// The bar chart, if this is one.
    #[must_use]
    pub fn as_bars(&self) -> Option<&BarChart> {
        match self {
            Self::Bars(chart) => Some(chart),
            Self::Lines(_) => None,
        }
    }

    /// The line chart, if this is one.
    #[must_use]
    pub fn as_lines(&self) -> Option<&LineChart> {
        match self {
            Self::Lines(chart) => Some(chart),
            Self::Bars(_) => None,
        }
    }
}

impl From<BarChart> for Figure {
    fn from(chart: BarChart) -> Self {
        Self::Bars(chart)
    }
}

impl From<LineChart> for Figure {
    fn from(chart: LineChart) -> Self {
        Self::Lines(chart)
    }
}

/// Writes a [`Figure`] to a file.
pub trait FigureRenderer {
    /// Render `figure` to `path`, replacing any existing file.
    fn render(&self, figure: &Figure, path: &Path) -> Result<()>;
}

/// Padded `(min, max)` of the finite values, always a non-empty range.
pub(crate) fn value_bounds(values: impl IntoIterator<Item = f64>, include_zero: bool) -> (f64, f64) {
    let (mut min, mut max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return (0.0, 1.0);
    }
    if include_zero {
        min = min.min(0.0);
        max = max.max(0.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 0.5, max + 0.5);
    }

    let padding = (max - min) * 0.05;
    (
        if min < 0.0 || !include_zero { min - padding } else { min },
        max + padding,
    )
}
