//! Error types for corner-eval operations.

use thiserror::Error;

/// Result type alias for corner-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, evaluating, or plotting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Failed to download the dataset.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A required column is absent from the dataset document.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The dataset document has a shape that cannot form a table.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Asked for more rows than the dataset holds.
    #[error("Cannot sample {requested} rows from a dataset of {available}")]
    SampleTooLarge {
        /// Number of rows requested.
        requested: usize,
        /// Number of rows in the dataset.
        available: usize,
    },

    /// Failed to calculate a regression metric.
    #[error("Metric calculation failed: {metric}: {reason}")]
    MetricCalculation {
        /// Name of the metric that failed.
        metric: String,
        /// Reason for the failure.
        reason: String,
    },

    /// Failed to draw or encode a chart.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
