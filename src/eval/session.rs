//! Model evaluation session.
//!
//! [`ModelEvaluation`] owns the dataset and the run directory. It builds the
//! three comparison charts and writes them through a [`FigureRenderer`].

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::chart::{BarChart, ChartConfig, Figure, FigureRenderer, LineChart, PngRenderer, Rgb};
use crate::dataset::{DEFAULT_URL, Dataset, Row};
use crate::error::{Error, Result};
use crate::eval::output::{DEFAULT_PLOTS_ROOT, OutputDir};
use crate::metrics::evaluate_all;

/// Rows drawn for the sample bar chart.
pub const SAMPLE_SIZE: usize = 10;

/// Width of a single bar, in category units.
pub const BAR_WIDTH: f64 = 0.25;

/// File name of the sample bar chart.
pub const SAMPLE_BARS_FILE: &str = "sample-bars.png";
/// File name of the full-series line chart.
pub const COMPARISON_PLOTS_FILE: &str = "comparison-plots.png";
/// File name of the metrics bar chart.
pub const EVALUATION_METRICS_FILE: &str = "evaluation-metrics.png";

/// Configuration for an evaluation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Where the dataset is downloaded from.
    pub source_url: String,

    /// Directory under which the timestamped run directory is created.
    pub plots_root: PathBuf,

    /// Seed for the row sample. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_URL.to_string(),
            plots_root: PathBuf::from(DEFAULT_PLOTS_ROOT),
            seed: None,
        }
    }
}

impl EvalConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::default()
    }
}

/// Builder for [`EvalConfig`].
#[derive(Debug, Default)]
pub struct EvalConfigBuilder {
    source_url: Option<String>,
    plots_root: Option<PathBuf>,
    seed: Option<u64>,
}

impl EvalConfigBuilder {
    /// Set the dataset URL.
    #[must_use]
    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Set the root of the run directories.
    #[must_use]
    pub fn plots_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.plots_root = Some(path.into());
        self
    }

    /// Fix the sampling seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration. Unset fields keep their defaults.
    #[must_use]
    pub fn build(self) -> EvalConfig {
        let defaults = EvalConfig::default();
        EvalConfig {
            source_url: self.source_url.unwrap_or(defaults.source_url),
            plots_root: self.plots_root.unwrap_or(defaults.plots_root),
            seed: self.seed,
        }
    }
}

/// One evaluation run over a corner-count dataset.
///
/// # Example
///
/// ```rust,no_run
/// use corner_eval::{EvalConfig, ModelEvaluation};
///
/// let mut evaluation = ModelEvaluation::new(EvalConfig::default())?;
/// let dir = evaluation.draw_plots()?;
/// println!("{}", dir.display());
/// # Ok::<(), corner_eval::Error>(())
/// ```
pub struct ModelEvaluation {
    data: Dataset,
    output_dir: OutputDir,
    rng: StdRng,
    renderer: Box<dyn FigureRenderer>,
}

impl ModelEvaluation {
    /// Download the dataset from `config.source_url`, then create the run
    /// directory.
    pub fn new(config: EvalConfig) -> Result<Self> {
        let data = Dataset::fetch(&config.source_url)?;
        Self::with_dataset(config, data)
    }

    /// Use an already loaded dataset and create the run directory.
    ///
    /// `config.source_url` is not used.
    pub fn with_dataset(config: EvalConfig, data: Dataset) -> Result<Self> {
        let output_dir = OutputDir::create(&config.plots_root)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            data,
            output_dir,
            rng,
            renderer: Box::new(PngRenderer),
        })
    }

    /// Replace the renderer used by [`save_plot`](Self::save_plot).
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl FigureRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// The loaded dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    /// The run directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        self.output_dir.path()
    }

    /// Grouped bars of truth and predicted corners for a random sample of
    /// [`SAMPLE_SIZE`] rows.
    ///
    /// Fails with [`Error::SampleTooLarge`] when the dataset is smaller than
    /// the sample.
    pub fn draw_bars(&mut self) -> Result<Figure> {
        let available = self.data.len();
        if available < SAMPLE_SIZE {
            return Err(Error::SampleTooLarge {
                requested: SAMPLE_SIZE,
                available,
            });
        }

        let names = self.data.names();
        let truth = self.data.rb_corners();
        let predicted = self.data.gt_corners();
        // Sampled indices are all below `available`.
        let rows: Vec<Row> = rand::seq::index::sample(&mut self.rng, available, SAMPLE_SIZE)
            .iter()
            .map(|i| Row::new(names[i].clone(), truth[i], predicted[i]))
            .collect();
        // Last SAMPLE_SIZE rows of the sample, i.e. all of them.
        let rows = &rows[rows.len().saturating_sub(SAMPLE_SIZE)..];
        debug!(rows = ?rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), "sampled rows");

        let config = ChartConfig::new()
            .with_x_label("Rooms")
            .with_y_label("Corners")
            .with_dimensions(1200, 800);
        let chart = BarChart::new(config, rows.iter().map(|r| r.name.clone()).collect(), BAR_WIDTH)
            .with_series("truth", Rgb::RED, rows.iter().map(|r| r.rb_corners).collect())
            .with_series("predicted", Rgb::GREEN, rows.iter().map(|r| r.gt_corners).collect())
            .with_tick_offset(BAR_WIDTH);

        Ok(chart.into())
    }

    /// Truth and predicted series over the whole dataset, against row index.
    #[must_use]
    pub fn draw_subplots(&self) -> Figure {
        let config = ChartConfig::new().with_dimensions(2000, 600);
        LineChart::new(config)
            .with_indexed_series("Truth", Rgb::BLUE, 2, self.data.rb_corners())
            .with_indexed_series("Predicted", Rgb::ORANGE, 2, self.data.gt_corners())
            .into()
    }

    /// One bar per regression metric, truth series first.
    pub fn draw_evaluations(&self) -> Result<Figure> {
        let results = evaluate_all(self.data.rb_corners(), self.data.gt_corners())?;
        for result in &results {
            debug!(metric = %result.metric, value = result.value, "computed metric");
        }

        let config = ChartConfig::new()
            .with_x_label("Metrics")
            .with_y_label("Values")
            .with_dimensions(1200, 800);
        let chart = BarChart::new(
            config,
            results.iter().map(|r| r.metric.name().to_string()).collect(),
            BAR_WIDTH,
        )
        .with_series("truth", Rgb::RED, results.iter().map(|r| r.value).collect());

        Ok(chart.into())
    }

    /// Render `figure` to `filename` inside the run directory.
    pub fn save_plot(&self, filename: &str, figure: &Figure) -> Result<PathBuf> {
        let path = self.output_dir.join(filename);
        self.renderer.render(figure, &path)?;
        info!(path = %path.display(), "saved plot");
        Ok(path)
    }

    /// Draw and save all three charts, returning the run directory.
    pub fn draw_plots(&mut self) -> Result<PathBuf> {
        let bars = self.draw_bars()?;
        self.save_plot(SAMPLE_BARS_FILE, &bars)?;
        self.save_plot(COMPARISON_PLOTS_FILE, &self.draw_subplots())?;
        self.save_plot(EVALUATION_METRICS_FILE, &self.draw_evaluations()?)?;

        Ok(self.output_dir.path().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use super::*;
    use crate::metrics::RegressionMetric;

    /// Writes the figure description as JSON instead of an image.
    struct JsonRenderer;

    impl FigureRenderer for JsonRenderer {
        fn render(&self, figure: &Figure, path: &Path) -> Result<()> {
            fs::write(path, serde_json::to_vec(figure)?)?;
            Ok(())
        }
    }

    fn rooms(n: usize) -> Dataset {
        Dataset::from_rows((0..n).map(|i| {
            let truth = (4 + i % 5) as f64;
            Row::new(format!("room-{i}"), truth, truth + (i % 3) as f64 - 1.0)
        }))
    }

    fn evaluation(root: &Path, data: Dataset, seed: u64) -> ModelEvaluation {
        let config = EvalConfig::builder().plots_root(root).seed(seed).build();
        ModelEvaluation::with_dataset(config, data)
            .unwrap()
            .with_renderer(JsonRenderer)
    }

    #[test]
    fn test_eval_config_builder() {
        let config = EvalConfig::builder()
            .source_url("http://localhost/data.json")
            .plots_root("/tmp/plots")
            .seed(7)
            .build();

        assert_eq!(config.source_url, "http://localhost/data.json");
        assert_eq!(config.plots_root, PathBuf::from("/tmp/plots"));
        assert_eq!(config.seed, Some(7));

        let defaults = EvalConfig::builder().build();
        assert_eq!(defaults, EvalConfig::default());
        assert_eq!(defaults.source_url, DEFAULT_URL);
        assert_eq!(defaults.plots_root, PathBuf::from("plots"));
        assert_eq!(defaults.seed, None);
    }

    #[test]
    fn test_draw_bars_samples_ten_rows() {
        let root = tempfile::tempdir().unwrap();
        let mut eval = evaluation(root.path(), rooms(25), 1);

        let figure = eval.draw_bars().unwrap();
        let chart = figure.as_bars().unwrap();

        assert_eq!(chart.category_count(), SAMPLE_SIZE);
        assert_eq!(chart.bars_per_category(), 2);
        assert_eq!(chart.bars().count(), 2 * SAMPLE_SIZE);
        assert_eq!(chart.series[0].name, "truth");
        assert_eq!(chart.series[1].name, "predicted");
        assert_eq!(chart.tick_offset, BAR_WIDTH);
        assert_eq!(chart.config.x_label, "Rooms");

        // Sampled without replacement
        let mut names = chart.categories.clone();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SAMPLE_SIZE);
    }

    #[test]
    fn test_draw_bars_rows_stay_aligned() {
        let root = tempfile::tempdir().unwrap();
        let data = rooms(30);
        let mut eval = evaluation(root.path(), data.clone(), 3);

        let figure = eval.draw_bars().unwrap();
        let chart = figure.as_bars().unwrap();

        for (i, name) in chart.categories.iter().enumerate() {
            let row = data.rows().find(|r| &r.name == name).unwrap();
            assert_eq!(chart.series[0].values[i], row.rb_corners);
            assert_eq!(chart.series[1].values[i], row.gt_corners);
        }
    }

    #[test]
    fn test_draw_bars_seed_is_reproducible() {
        let first_root = tempfile::tempdir().unwrap();
        let second_root = tempfile::tempdir().unwrap();
        let mut first = evaluation(first_root.path(), rooms(50), 99);
        let mut second = evaluation(second_root.path(), rooms(50), 99);

        assert_eq!(first.draw_bars().unwrap(), second.draw_bars().unwrap());
    }

    #[test]
    fn test_draw_bars_needs_ten_rows() {
        let root = tempfile::tempdir().unwrap();
        let mut eval = evaluation(root.path(), rooms(9), 1);

        let err = eval.draw_bars().unwrap_err();
        assert!(matches!(
            err,
            Error::SampleTooLarge {
                requested: 10,
                available: 9
            }
        ));
    }

    #[test]
    fn test_draw_subplots_uses_every_row() {
        let root = tempfile::tempdir().unwrap();
        let eval = evaluation(root.path(), rooms(37), 1);

        let figure = eval.draw_subplots();
        let chart = figure.as_lines().unwrap();

        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, "Truth");
        assert_eq!(chart.series[1].name, "Predicted");
        for series in &chart.series {
            assert_eq!(series.points.len(), 37);
            assert_eq!(series.points[36].0, 36.0);
        }
        assert_eq!(chart.series[0].points[2].1, eval.dataset().rb_corners()[2]);
        assert_eq!((chart.config.width, chart.config.height), (2000, 600));
    }

    #[test]
    fn test_draw_evaluations_bar_heights() {
        let root = tempfile::tempdir().unwrap();
        let data = Dataset::from_rows([
            Row::new("a", 1.0, 1.0),
            Row::new("b", 2.0, 2.0),
            Row::new("c", 3.0, 2.0),
            Row::new("d", 4.0, 5.0),
        ]);
        let eval = evaluation(root.path(), data.clone(), 1);

        let figure = eval.draw_evaluations().unwrap();
        let chart = figure.as_bars().unwrap();

        assert_eq!(chart.category_count(), 5);
        assert_eq!(chart.bars_per_category(), 1);
        assert_eq!(chart.categories[0], "mean_squared_error");
        assert!((chart.series[0].values[0] - 0.5).abs() < 1e-12);

        for (i, metric) in RegressionMetric::ALL.iter().enumerate() {
            assert_eq!(chart.categories[i], metric.name());
            let expected = metric.compute(data.rb_corners(), data.gt_corners()).unwrap();
            assert_eq!(chart.series[0].values[i], expected);
        }
    }

    #[test]
    fn test_draw_plots_writes_three_files() {
        let root = tempfile::tempdir().unwrap();
        let mut eval = evaluation(root.path(), rooms(12), 5);
        let before = eval.output_dir().to_path_buf();

        let dir = eval.draw_plots().unwrap();
        assert_eq!(dir, before);
        assert_eq!(eval.output_dir(), before);

        let mut files: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        assert_eq!(
            files,
            [COMPARISON_PLOTS_FILE, EVALUATION_METRICS_FILE, SAMPLE_BARS_FILE]
        );

        let saved: Figure =
            serde_json::from_slice(&fs::read(dir.join(EVALUATION_METRICS_FILE)).unwrap()).unwrap();
        assert_eq!(saved, eval.draw_evaluations().unwrap());
    }

    #[test]
    fn test_draw_plots_writes_png_by_default() {
        let root = tempfile::tempdir().unwrap();
        let config = EvalConfig::builder().plots_root(root.path()).seed(9).build();
        let mut eval = ModelEvaluation::with_dataset(config, rooms(12)).unwrap();

        let dir = eval.draw_plots().unwrap();
        for file in [SAMPLE_BARS_FILE, COMPARISON_PLOTS_FILE, EVALUATION_METRICS_FILE] {
            let bytes = fs::read(dir.join(file)).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"), "{file} is not a PNG");
        }
    }

    #[test]
    fn test_two_runs_use_distinct_directories() {
        let root = tempfile::tempdir().unwrap();
        let mut first = evaluation(root.path(), rooms(10), 1);
        std::thread::sleep(Duration::from_millis(2));
        let mut second = evaluation(root.path(), rooms(10), 1);

        let first_dir = first.draw_plots().unwrap();
        let second_dir = second.draw_plots().unwrap();

        assert_ne!(first_dir, second_dir);
        assert_eq!(fs::read_dir(&first_dir).unwrap().count(), 3);
        assert_eq!(fs::read_dir(&second_dir).unwrap().count(), 3);
    }

    #[test]
    fn test_draw_plots_stops_at_first_failure() {
        let root = tempfile::tempdir().unwrap();
        let mut eval = evaluation(root.path(), rooms(5), 1);

        assert!(eval.draw_plots().is_err());
        assert_eq!(fs::read_dir(eval.output_dir()).unwrap().count(), 0);

        eval.save_plot(COMPARISON_PLOTS_FILE, &eval.draw_subplots()).unwrap();
        assert!(eval.output_dir().join(COMPARISON_PLOTS_FILE).is_file());
    }
}
