//! # corner-eval
//!
//! Evaluation of a corner-count model against ground truth.
//!
//! The library downloads a comparison dataset, computes regression metrics
//! between the truth (`rb_corners`) and predicted (`gt_corners`) series, and
//! renders three charts into a timestamped directory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use corner_eval::{EvalConfig, ModelEvaluation};
//!
//! let config = EvalConfig::builder()
//!     .plots_root("./plots")
//!     .seed(42)
//!     .build();
//!
//! let mut evaluation = ModelEvaluation::new(config)?;
//! let dir = evaluation.draw_plots()?;
//! println!("{}", dir.display());
//! # Ok::<(), corner_eval::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`dataset`]: The comparison table and its loader
//! - [`metrics`]: Regression metrics (MSE, R², MAE, explained variance, D²)
//! - [`chart`]: Chart descriptions and PNG rendering
//! - [`eval`]: Evaluation session and output directories

pub mod chart;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod metrics;

// Re-export commonly used types
pub use chart::{BarChart, ChartConfig, Figure, FigureRenderer, LineChart, PngRenderer};
pub use dataset::{Dataset, Row};
pub use error::{Error, Result};
pub use eval::{EvalConfig, ModelEvaluation, OutputDir};
pub use metrics::{MetricResult, RegressionMetric};
