//! Regression metrics for comparing the truth and predicted series.
//!
//! Every metric takes `(y_true, y_pred)` in that order and returns a scalar:
//!
//! | Metric | Best | Definition |
//! |--------|------|------------|
//! | `mean_squared_error` | 0 | mean((t - p)^2) |
//! | `r2_score` | 1 | 1 - SS_res / SS_tot |
//! | `mean_absolute_error` | 0 | mean(\|t - p\|) |
//! | `explained_variance_score` | 1 | 1 - Var(t - p) / Var(t) |
//! | `d2_absolute_error_score` | 1 | 1 - sum(\|t - p\|) / sum(\|t - median(t)\|) |
//!
//! Score metrics with a zero denominator return 1.0 for a perfect prediction
//! and 0.0 otherwise, so the result is always finite. `r2_score` and
//! `d2_absolute_error_score` are undefined for fewer than two samples and
//! return NaN.

mod regression;

use serde::{Deserialize, Serialize};

pub use regression::{
    d2_absolute_error_score, explained_variance_score, mean_absolute_error, mean_squared_error,
    r2_score,
};

use crate::error::Result;

/// The regression metrics shown on the evaluation chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressionMetric {
    /// Mean squared error.
    MeanSquaredError,
    /// Coefficient of determination (R²).
    R2Score,
    /// Mean absolute error.
    MeanAbsoluteError,
    /// Explained variance.
    ExplainedVarianceScore,
    /// D² score based on absolute error.
    D2AbsoluteErrorScore,
}

impl RegressionMetric {
    /// All metrics, in chart order.
    pub const ALL: [Self; 5] = [
        Self::MeanSquaredError,
        Self::R2Score,
        Self::MeanAbsoluteError,
        Self::ExplainedVarianceScore,
        Self::D2AbsoluteErrorScore,
    ];

    /// Function name of the metric, used as its chart label.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MeanSquaredError => "mean_squared_error",
            Self::R2Score => "r2_score",
            Self::MeanAbsoluteError => "mean_absolute_error",
            Self::ExplainedVarianceScore => "explained_variance_score",
            Self::D2AbsoluteErrorScore => "d2_absolute_error_score",
        }
    }

    /// Compute this metric for `y_true` against `y_pred`.
    pub fn compute(self, y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
        match self {
            Self::MeanSquaredError => mean_squared_error(y_true, y_pred),
            Self::R2Score => r2_score(y_true, y_pred),
            Self::MeanAbsoluteError => mean_absolute_error(y_true, y_pred),
            Self::ExplainedVarianceScore => explained_variance_score(y_true, y_pred),
            Self::D2AbsoluteErrorScore => d2_absolute_error_score(y_true, y_pred),
        }
    }
}

impl std::fmt::Display for RegressionMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A computed metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Which metric was computed.
    pub metric: RegressionMetric,
    /// Its value.
    pub value: f64,
}

/// Compute every metric in [`RegressionMetric::ALL`] order.
///
/// Stops at the first metric that rejects its input.
pub fn evaluate_all(y_true: &[f64], y_pred: &[f64]) -> Result<Vec<MetricResult>> {
    RegressionMetric::ALL
        .iter()
        .map(|&metric| {
            Ok(MetricResult {
                metric,
                value: metric.compute(y_true, y_pred)?,
            })
        })
        .collect()
}
