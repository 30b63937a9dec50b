//! Regression metric functions.

use crate::error::{Error, Result};

/// Mean squared error.
///
/// # Example
///
/// ```
/// use corner_eval::metrics::mean_squared_error;
///
/// let mse = mean_squared_error(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 2.0, 5.0]).unwrap();
/// assert!((mse - 0.5).abs() < 1e-12);
/// ```
pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_targets("mean_squared_error", y_true, y_pred)?;
    let sum: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    Ok(sum / y_true.len() as f64)
}

/// Mean absolute error.
pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_targets("mean_absolute_error", y_true, y_pred)?;
    let sum: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum();
    Ok(sum / y_true.len() as f64)
}

/// Coefficient of determination.
///
/// Returns NaN for fewer than two samples.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_targets("r2_score", y_true, y_pred)?;
    if y_true.len() < 2 {
        return Ok(f64::NAN);
    }

    let t_mean = mean(y_true);
    let numerator: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let denominator: f64 = y_true.iter().map(|t| (t - t_mean).powi(2)).sum();

    Ok(finite_score(numerator, denominator))
}

/// Explained variance score.
///
/// Uses population variance for both the residuals and the truth series.
pub fn explained_variance_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_targets("explained_variance_score", y_true, y_pred)?;

    let residuals: Vec<f64> = y_true.iter().zip(y_pred).map(|(t, p)| t - p).collect();
    let numerator = variance(&residuals);
    let denominator = variance(y_true);

    Ok(finite_score(numerator, denominator))
}

/// D² score with absolute error as the loss.
///
/// Compares the absolute error of the prediction with that of a constant
/// prediction at the median of `y_true`. Returns NaN for fewer than two
/// samples.
pub fn d2_absolute_error_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_targets("d2_absolute_error_score", y_true, y_pred)?;
    if y_true.len() < 2 {
        return Ok(f64::NAN);
    }

    let t_median = median(y_true);
    let numerator: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum();
    let denominator: f64 = y_true.iter().map(|t| (t - t_median).abs()).sum();

    Ok(finite_score(numerator, denominator))
}

/// Shared input checks: non-empty, equal length, all values finite.
fn check_targets(metric: &str, y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    let fail = |reason: String| Error::MetricCalculation {
        metric: metric.to_string(),
        reason,
    };

    if y_true.len() != y_pred.len() {
        return Err(fail(format!(
            "inconsistent numbers of samples: [{}, {}]",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(fail("found array with 0 samples".to_string()));
    }
    if y_true.iter().chain(y_pred).any(|v| !v.is_finite()) {
        return Err(fail("input contains NaN or infinity".to_string()));
    }
    Ok(())
}

/// `1 - numerator / denominator`, forced finite when the denominator is zero.
fn finite_score(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        1.0 - numerator / denominator
    } else if numerator != 0.0 {
        0.0
    } else {
        1.0
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Median with linear interpolation between the two middle values.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
